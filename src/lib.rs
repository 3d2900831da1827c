//! blog-rs: content collections and an RSS feed for a static blog
//!
//! Entries are Markdown files with YAML front-matter, grouped into named
//! collections under the content directory. Each collection has a schema
//! that every entry is validated against. The feed for one collection is
//! served over HTTP or written to the public directory.

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentLoader, FsContentStore, MarkdownRenderer, SchemaRegistry};
use feed::FeedBuilder;

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory, one subdirectory per collection
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Declared collections
    pub registry: Arc<SchemaRegistry>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            registry: Arc::new(SchemaRegistry::default()),
        }
    }

    /// Loader for the content directory, rendering with the configured highlighter
    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(
            &self.content_dir,
            Arc::clone(&self.registry),
            Arc::new(MarkdownRenderer::from_config(&self.config.highlight)),
        )
    }

    /// Feed builder reading from the content directory
    pub fn feed_builder(&self) -> FeedBuilder {
        let store = FsContentStore::new(self.loader());
        FeedBuilder::new(Arc::clone(&self.registry), Arc::new(store))
    }

    /// Write the feed to the public directory
    pub async fn build(&self, is_production: bool) -> Result<PathBuf> {
        commands::build::run(self, is_production).await
    }
}
