//! Validate every declared collection

use anyhow::{Context, Result};

use crate::Blog;

/// Load each collection, failing on the first invalid entry
pub fn run(blog: &Blog) -> Result<()> {
    let loader = blog.loader();

    for name in blog.registry.names() {
        let entries = loader
            .load_collection(name)
            .with_context(|| format!("Collection `{}` failed validation", name))?;
        let drafts = entries.iter().filter(|e| e.data.draft()).count();
        println!("  {}: {} entries ({} drafts)", name, entries.len(), drafts);
    }

    println!("All collections are valid.");
    Ok(())
}
