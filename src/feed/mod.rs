//! RSS feed for a collection
//!
//! [`FeedBuilder::build_feed`] retrieves a collection from the content
//! store, hides drafts in production, projects each entry to a
//! [`FeedItem`] and serializes the result as RSS 2.0.

mod rss;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::content::{ContentEntry, ContentError, ContentStore, SchemaRegistry};

pub use self::rss::to_rss;

/// Content type served with the feed document
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Channel-level metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    /// Base URL item links are resolved against
    pub site: Url,
}

/// One feed item, projected from a content entry
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// Site-relative link: `/<slug>/`
    pub link: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    /// Rendered HTML body
    pub content: String,
}

impl FeedItem {
    pub fn from_entry(entry: &ContentEntry) -> Self {
        Self {
            link: entry.url_path(),
            title: entry.data.title().map(str::to_string),
            description: entry.data.description().map(str::to_string),
            pub_date: entry.data.date(),
            content: entry.rendered.clone(),
        }
    }
}

/// A serialized feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub body: String,
    pub content_type: &'static str,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Collection `{0}` is not declared")]
    CollectionNotFound(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Cannot resolve link {link:?} against {site}: {source}")]
    InvalidLink {
        link: String,
        site: Url,
        #[source]
        source: url::ParseError,
    },

    #[error("Item {link:?} has a publication date RSS cannot express: {date}")]
    UnrepresentableDate { link: String, date: DateTime<Utc> },

    #[error("RSS validation failed: {0}")]
    Validation(#[from] ::rss::validation::ValidationError),

    #[error("Failed to write RSS: {0}")]
    Write(#[from] ::rss::Error),
}

/// Builds feeds from a content store
#[derive(Clone)]
pub struct FeedBuilder {
    registry: Arc<SchemaRegistry>,
    store: Arc<dyn ContentStore>,
}

impl FeedBuilder {
    pub fn new(registry: Arc<SchemaRegistry>, store: Arc<dyn ContentStore>) -> Self {
        Self { registry, store }
    }

    /// Feed items for `collection`, in store order.
    ///
    /// Drafts are dropped when `is_production` is set and kept otherwise.
    pub async fn feed_items(
        &self,
        collection: &str,
        is_production: bool,
    ) -> Result<Vec<FeedItem>, FeedError> {
        if !self.registry.contains(collection) {
            return Err(FeedError::CollectionNotFound(collection.to_string()));
        }

        let visible = move |entry: &ContentEntry| !is_production || !entry.data.draft();
        let entries = self.store.get_entries(collection, Some(&visible)).await?;

        tracing::debug!(
            "Feed for {} has {} items (production: {})",
            collection,
            entries.len(),
            is_production
        );

        Ok(entries.iter().map(FeedItem::from_entry).collect())
    }

    /// Build the RSS document for `collection`
    pub async fn build_feed(
        &self,
        collection: &str,
        is_production: bool,
        site: &SiteMetadata,
    ) -> Result<FeedDocument, FeedError> {
        let items = self.feed_items(collection, is_production).await?;
        let body = to_rss(site, &items)?;

        Ok(FeedDocument {
            body,
            content_type: RSS_CONTENT_TYPE,
        })
    }
}
