//! Front-matter parsing

use serde_yaml::Mapping;

/// Split a Markdown source into its YAML front-matter and body.
///
/// Front-matter is a `---` fenced block at the very start of the file.
/// A file without one yields an empty mapping and the whole text as body.
pub fn split(content: &str) -> Result<(Mapping, &str), serde_yaml::Error> {
    let trimmed = content.trim_start_matches('\u{feff}');

    let Some(rest) = trimmed.strip_prefix("---") else {
        return Ok((Mapping::new(), content));
    };
    // The opening fence must be alone on its line
    if !(rest.starts_with('\n') || rest.starts_with("\r\n")) {
        return Ok((Mapping::new(), content));
    }
    let rest = rest.trim_start_matches(['\n', '\r']);

    let (yaml_content, remaining) = if let Some(body) = rest.strip_prefix("---") {
        ("", body)
    } else if let Some(end_pos) = rest.find("\n---") {
        (&rest[..end_pos], &rest[end_pos + 4..])
    } else {
        // No closing fence, treat as no front-matter
        return Ok((Mapping::new(), content));
    };
    let remaining = remaining.trim_start_matches(['\n', '\r']);

    if yaml_content.trim().is_empty() {
        return Ok((Mapping::new(), remaining));
    }

    let fm: Mapping = serde_yaml::from_str(yaml_content)?;
    Ok((fm, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
draft: true
---

This is the content.
"#;

        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.get("title").and_then(|v| v.as_str()), Some("Hello World"));
        assert_eq!(fm.get("draft").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.\n";
        let (fm, body) = split(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = split("---\n---\nBody\n").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let content = "---\ntitle: nope\n\nNever closed.\n";
        let (fm, body) = split(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_thematic_break_is_not_frontmatter() {
        let content = "---- \nSome text\n---\n";
        let (fm, _) = split(content).unwrap();
        assert!(fm.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nBody\n";
        assert!(split(content).is_err());
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.get("title").and_then(|v| v.as_str()), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }
}
