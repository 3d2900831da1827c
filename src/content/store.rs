//! Content retrieval

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ContentEntry, ContentError, ContentLoader};

/// Predicate selecting which entries to return
pub type EntryFilter<'a> = &'a (dyn Fn(&ContentEntry) -> bool + Send + Sync);

/// Source of validated, rendered collection entries
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All entries of `collection` accepted by `filter`, in store order
    async fn get_entries(
        &self,
        collection: &str,
        filter: Option<EntryFilter<'_>>,
    ) -> Result<Vec<ContentEntry>, ContentError>;
}

/// Store backed by Markdown files on disk.
///
/// Every call re-reads the collection, so edits show up on the next request.
#[derive(Clone)]
pub struct FsContentStore {
    loader: Arc<ContentLoader>,
}

impl FsContentStore {
    pub fn new(loader: ContentLoader) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn get_entries(
        &self,
        collection: &str,
        filter: Option<EntryFilter<'_>>,
    ) -> Result<Vec<ContentEntry>, ContentError> {
        let loader = Arc::clone(&self.loader);
        let name = collection.to_string();
        let entries =
            tokio::task::spawn_blocking(move || loader.load_collection(&name)).await??;

        Ok(apply_filter(entries, filter))
    }
}

/// Store holding pre-built entries in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    collections: HashMap<String, Vec<ContentEntry>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to its collection
    pub fn insert(&mut self, entry: ContentEntry) {
        self.collections
            .entry(entry.collection.clone())
            .or_default()
            .push(entry);
    }
}

impl FromIterator<ContentEntry> for MemoryContentStore {
    fn from_iter<I: IntoIterator<Item = ContentEntry>>(iter: I) -> Self {
        let mut store = Self::new();
        for entry in iter {
            store.insert(entry);
        }
        store
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_entries(
        &self,
        collection: &str,
        filter: Option<EntryFilter<'_>>,
    ) -> Result<Vec<ContentEntry>, ContentError> {
        let entries = self
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default();
        Ok(apply_filter(entries, filter))
    }
}

fn apply_filter(entries: Vec<ContentEntry>, filter: Option<EntryFilter<'_>>) -> Vec<ContentEntry> {
    match filter {
        Some(keep) => entries.into_iter().filter(|e| keep(e)).collect(),
        None => entries,
    }
}
