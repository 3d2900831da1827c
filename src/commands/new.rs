//! Create a new entry

use anyhow::Result;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

use crate::content::{CollectionSchema, FieldType};
use crate::Blog;

/// Create a new entry in `collection`, named after `title` unless `path` is given.
///
/// Every required field gets a placeholder value so the entry validates.
/// Collections with a `draft` field start the entry as a draft.
pub fn create_entry(
    blog: &Blog,
    title: &str,
    collection: &str,
    path: Option<&str>,
) -> Result<PathBuf> {
    let Some(schema) = blog.registry.get(collection) else {
        anyhow::bail!(
            "Unknown collection: {}. Available: {}",
            collection,
            blog.registry.names().collect::<Vec<_>>().join(", ")
        );
    };

    let target_dir = blog.content_dir.join(collection);
    fs::create_dir_all(&target_dir)?;

    let filename = match path {
        Some(p) => format!("{}.md", p.trim_end_matches(".md")),
        None => format!("{}.md", slug::slugify(title)),
    };
    let file_path = target_dir.join(filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let frontmatter = serde_yaml::to_string(&scaffold(schema, title))?;
    let content = format!("---\n{}---\n", frontmatter);

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Front-matter with a value for every required field and `draft: true`
fn scaffold(schema: &CollectionSchema, title: &str) -> Mapping {
    let now = chrono::Utc::now();
    let mut fm = Mapping::new();

    for (name, spec) in schema.fields() {
        let value = match (name, spec.ty) {
            ("draft", FieldType::Boolean) => Value::Bool(true),
            _ if !spec.required => continue,
            (_, FieldType::String) => Value::String(title.to_string()),
            (_, FieldType::Date) => Value::String(now.format("%Y-%m-%d %H:%M:%S").to_string()),
            (_, FieldType::Boolean) => Value::Bool(false),
        };
        fm.insert(Value::String(name.to_string()), value);
    }

    fm
}
