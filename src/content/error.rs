//! Content retrieval errors

use std::path::PathBuf;
use thiserror::Error;

use super::schema::SchemaValidationError;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Collection `{0}` is not declared")]
    UnknownCollection(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter in {collection}/{entry}: {source}")]
    Frontmatter {
        collection: String,
        entry: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Validation(#[from] SchemaValidationError),

    #[error("Failed to render {collection}/{entry}: {message}")]
    Render {
        collection: String,
        entry: String,
        message: String,
    },

    #[error("Duplicate slug `{slug}` in collection `{collection}`: {first} and {second}")]
    DuplicateSlug {
        collection: String,
        slug: String,
        first: String,
        second: String,
    },

    #[error("Content loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
