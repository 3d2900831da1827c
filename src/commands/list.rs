//! List collection entries

use anyhow::Result;

use crate::Blog;

/// Print the entries of `collection`, skipping drafts unless `drafts` is set
pub fn run(blog: &Blog, collection: &str, drafts: bool) -> Result<()> {
    if !blog.registry.contains(collection) {
        anyhow::bail!(
            "Unknown collection: {}. Available: {}",
            collection,
            blog.registry.names().collect::<Vec<_>>().join(", ")
        );
    }

    let entries = blog.loader().load_collection(collection)?;
    let shown: Vec<_> = entries
        .iter()
        .filter(|e| drafts || !e.data.draft())
        .collect();

    println!("{} ({}):", collection, shown.len());
    for entry in shown {
        let date = entry
            .data
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!(
            "  {} - {} [{}]{}",
            date,
            entry.data.title().unwrap_or("Untitled"),
            entry.url_path(),
            if entry.data.draft() { " (draft)" } else { "" }
        );
    }

    Ok(())
}
