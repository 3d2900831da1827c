//! Content module - collection schemas, entry loading and rendering

mod entry;
mod error;
pub mod frontmatter;
pub mod loader;
mod markdown;
pub mod schema;
pub mod store;

pub use entry::{slug_from_id, ContentEntry};
pub use error::ContentError;
pub use loader::ContentLoader;
pub use markdown::{EntryRenderer, MarkdownRenderer};
pub use schema::{
    CollectionSchema, EntryData, FieldSpec, FieldType, FieldValue, SchemaRegistry,
    SchemaValidationError, ValidationIssue,
};
pub use store::{ContentStore, EntryFilter, FsContentStore, MemoryContentStore};
