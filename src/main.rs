//! CLI entry point for blog-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-rs")]
#[command(version)]
#[command(about = "Content collections and RSS feed for a static blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the feed to the public directory
    #[command(alias = "b")]
    Build {
        /// Include drafts in the feed
        #[arg(long)]
        development: bool,
    },

    /// Serve the feed over HTTP
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Hide drafts, as in a production build
        #[arg(long)]
        production: bool,
    },

    /// Validate every collection against its schema
    Check,

    /// List the entries of a collection
    List {
        /// Collection to list
        #[arg(default_value = "posts")]
        collection: String,

        /// Include drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Create a new entry
    New {
        /// Title of the new entry
        title: String,

        /// Collection to add the entry to
        #[arg(short, long, default_value = "posts")]
        collection: String,

        /// File name (without extension) for the new entry
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_rs=debug,info"
    } else {
        "blog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Build { development } => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            tracing::info!(
                "Building feed ({} mode)...",
                if development { "development" } else { "production" }
            );
            let output = blog.build(!development).await?;
            println!("Generated {:?}", output);
        }

        Commands::Serve {
            port,
            ip,
            production,
        } => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog_rs::server::start(&blog, &ip, port, production).await?;
        }

        Commands::Check => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            blog_rs::commands::check::run(&blog)?;
        }

        Commands::List { collection, drafts } => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            blog_rs::commands::list::run(&blog, &collection, drafts)?;
        }

        Commands::New {
            title,
            collection,
            path,
        } => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            tracing::info!("Creating new {} entry with title: {}", collection, title);
            blog_rs::commands::new::create_entry(&blog, &title, &collection, path.as_deref())?;
        }

        Commands::Version => {
            println!("blog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
