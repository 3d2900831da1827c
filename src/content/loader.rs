//! Content loader - reads, validates and renders collection entries

use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::entry::slug_from_id;
use super::schema::{
    CollectionSchema, FieldType, SchemaRegistry, SchemaValidationError, ValidationIssue,
};
use super::{frontmatter, ContentEntry, ContentError, EntryRenderer};

/// Loads collections from `<content_dir>/<collection>/`
pub struct ContentLoader {
    content_dir: PathBuf,
    registry: Arc<SchemaRegistry>,
    renderer: Arc<dyn EntryRenderer>,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(
        content_dir: impl Into<PathBuf>,
        registry: Arc<SchemaRegistry>,
        renderer: Arc<dyn EntryRenderer>,
    ) -> Self {
        Self {
            content_dir: content_dir.into(),
            registry,
            renderer,
        }
    }

    /// Load every entry of a collection, ordered by id.
    ///
    /// Any unreadable file, invalid front-matter, schema violation or
    /// render failure aborts the whole load.
    pub fn load_collection(&self, name: &str) -> Result<Vec<ContentEntry>, ContentError> {
        let schema = self
            .registry
            .get(name)
            .ok_or_else(|| ContentError::UnknownCollection(name.to_string()))?;

        let collection_dir = self.content_dir.join(name);
        if !collection_dir.is_dir() {
            tracing::warn!(
                "Collection {} has no directory at {:?}, treating it as empty",
                name,
                collection_dir
            );
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        let walker = WalkDir::new(&collection_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored(e.path()));

        for dir_entry in walker {
            let dir_entry = dir_entry.map_err(|e| ContentError::Io {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| collection_dir.clone()),
                source: e.into(),
            })?;

            let path = dir_entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let entry = self.load_entry(schema, &collection_dir, path)?;
            if let Some(first) = seen.insert(entry.slug.clone(), entry.id.clone()) {
                return Err(ContentError::DuplicateSlug {
                    collection: name.to_string(),
                    slug: entry.slug,
                    first,
                    second: entry.id,
                });
            }
            entries.push(entry);
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!("Loaded {} entries from {}", entries.len(), name);

        Ok(entries)
    }

    /// Load a single entry from a file
    fn load_entry(
        &self,
        schema: &CollectionSchema,
        collection_dir: &Path,
        path: &Path,
    ) -> Result<ContentEntry, ContentError> {
        let collection = schema.name();
        let id = entry_id(collection_dir, path);

        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (mut fm, body) =
            frontmatter::split(&content).map_err(|source| ContentError::Frontmatter {
                collection: collection.to_string(),
                entry: id.clone(),
                source,
            })?;

        // `slug` is reserved: it overrides the path-derived slug
        let slug_error = |issue: ValidationIssue| SchemaValidationError {
            collection: collection.to_string(),
            entry: id.clone(),
            field: "slug".to_string(),
            issue,
        };
        let slug = match fm.remove("slug") {
            None | Some(Value::Null) => slug_from_id(&id),
            Some(Value::String(s)) => s.trim().trim_matches('/').to_string(),
            Some(_) => {
                return Err(slug_error(ValidationIssue::InvalidType {
                    expected: FieldType::String,
                    found: "non-string value",
                })
                .into())
            }
        };
        if slug.is_empty() {
            return Err(slug_error(ValidationIssue::Empty).into());
        }

        let data = schema.validate(&id, &fm)?;

        let mut entry = ContentEntry {
            id,
            collection: collection.to_string(),
            slug,
            data,
            body: body.to_string(),
            rendered: String::new(),
        };

        entry.rendered =
            self.renderer
                .render_entry(&entry)
                .map_err(|e| ContentError::Render {
                    collection: collection.to_string(),
                    entry: entry.id.clone(),
                    message: format!("{:#}", e),
                })?;

        tracing::debug!("Loaded entry {}/{} as /{}/", collection, entry.id, entry.slug);

        Ok(entry)
    }
}

/// Entry id: path relative to the collection directory, `/`-separated
fn entry_id(collection_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(collection_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Files and directories prefixed with `_` or `.` are not entries
fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_') || n.starts_with('.'))
        .unwrap_or(false)
}
