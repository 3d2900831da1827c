//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

use crate::feed::SiteMetadata;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            url: "http://localhost:4321".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            feed: FeedConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Channel-level metadata for the feed, with `url` parsed as the site base URL
    pub fn site_metadata(&self) -> Result<SiteMetadata> {
        let site = Url::parse(&self.url)
            .with_context(|| format!("Invalid site url in config: {:?}", self.url))?;
        Ok(SiteMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            site,
        })
    }
}

/// Feed endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Output path relative to the public dir, also the served route
    pub path: String,
    pub collection: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "rss.xml".to_string(),
            collection: "posts".to_string(),
        }
    }
}

impl FeedConfig {
    /// Route under which the feed is served, always with a leading slash
    pub fn route(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.feed.path, "rss.xml");
        assert_eq!(config.feed.collection, "posts");
        assert_eq!(config.content_dir, "content");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Field Notes
description: Things I wrote down
url: https://notes.example.com
feed:
  path: feed/rss.xml
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Field Notes");
        assert_eq!(config.url, "https://notes.example.com");
        assert_eq!(config.feed.path, "feed/rss.xml");
        // Unset nested fields keep their defaults
        assert_eq!(config.feed.collection, "posts");
        assert_eq!(config.feed.route(), "/feed/rss.xml");
    }

    #[test]
    fn test_site_metadata_rejects_bad_url() {
        let config = SiteConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.site_metadata().is_err());

        let meta = SiteConfig::default().site_metadata().unwrap();
        assert_eq!(meta.site.as_str(), "http://localhost:4321/");
    }
}
