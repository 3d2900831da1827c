//! Write the feed to the public directory

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::Blog;

/// Build the configured collection's feed and write it under the public dir
pub async fn run(blog: &Blog, is_production: bool) -> Result<PathBuf> {
    let start = std::time::Instant::now();

    let site = blog.config.site_metadata()?;
    let collection = &blog.config.feed.collection;
    let document = blog
        .feed_builder()
        .build_feed(collection, is_production, &site)
        .await
        .with_context(|| format!("Failed to build feed for collection `{}`", collection))?;

    let output_path = blog
        .public_dir
        .join(blog.config.feed.path.trim_start_matches('/'));
    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&output_path, document.body)
        .await
        .with_context(|| format!("Failed to write {:?}", output_path))?;

    tracing::info!(
        "Generated {:?} in {:.2}s",
        output_path,
        start.elapsed().as_secs_f64()
    );

    Ok(output_path)
}
