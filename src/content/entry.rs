//! Content entry model

use super::schema::EntryData;

/// One validated, rendered entry of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct ContentEntry {
    /// Source path relative to the collection directory, with `/` separators
    pub id: String,

    /// Name of the collection the entry belongs to
    pub collection: String,

    /// URL-friendly name, unique within the collection
    pub slug: String,

    /// Validated front-matter
    pub data: EntryData,

    /// Raw markdown body
    pub body: String,

    /// Rendered HTML body
    pub rendered: String,
}

impl ContentEntry {
    /// Site-relative URL of the entry: `/<slug>/`
    pub fn url_path(&self) -> String {
        format!("/{}/", self.slug)
    }
}

/// Derive a slug from an entry id.
///
/// Each path segment is slugified and the extension dropped. A trailing
/// `index` segment collapses into its directory.
///
/// ```ignore
/// slug_from_id("2024/Hello World.md") // -> "2024/hello-world"
/// slug_from_id("guides/index.md")     // -> "guides"
/// ```
pub fn slug_from_id(id: &str) -> String {
    let without_ext = match id.rfind('.') {
        Some(dot) if !id[dot..].contains('/') => &id[..dot],
        _ => id,
    };

    let slug = without_ext
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(slug::slugify)
        .collect::<Vec<_>>()
        .join("/");

    match slug.strip_suffix("/index") {
        Some(parent) => parent.to_string(),
        None => slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_id() {
        assert_eq!(slug_from_id("hello-world.md"), "hello-world");
        assert_eq!(slug_from_id("Hello World.md"), "hello-world");
        assert_eq!(slug_from_id("2024/First Post.markdown"), "2024/first-post");
        assert_eq!(slug_from_id("guides/index.md"), "guides");
        assert_eq!(slug_from_id("index.md"), "index");
        assert_eq!(slug_from_id("v1.2/notes"), "v1-2/notes");
    }

    #[test]
    fn test_url_path() {
        let entry = ContentEntry {
            id: "a.md".to_string(),
            collection: "posts".to_string(),
            slug: "a".to_string(),
            data: EntryData::default(),
            body: String::new(),
            rendered: String::new(),
        };
        assert_eq!(entry.url_path(), "/a/");
    }
}
