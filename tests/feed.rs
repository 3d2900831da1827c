use blog_rs::config::SiteConfig;
use blog_rs::content::{ContentError, SchemaValidationError, ValidationIssue};
use blog_rs::feed::{FeedError, RSS_CONTENT_TYPE};
use blog_rs::Blog;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn blog(dir: &Path) -> Blog {
    let config = SiteConfig {
        title: "Field Notes".to_string(),
        description: "Things I wrote down".to_string(),
        url: "https://example.com".to_string(),
        ..Default::default()
    };
    Blog::with_config(dir.to_path_buf(), config)
}

/// `A` is published, `B` is a draft
fn two_posts(dir: &Path) {
    write(
        dir,
        "content/posts/A.md",
        "---\ntitle: Hello\ndescription: The first one\ndate: 2024-01-01\ndraft: false\n---\n# Hi\n",
    );
    write(
        dir,
        "content/posts/B.md",
        "---\ntitle: Secret\ndescription: Not yet\ndate: 2024-02-01\ndraft: true\n---\nShh\n",
    );
}

async fn channel(blog: &Blog, is_production: bool) -> rss::Channel {
    let site = blog.config.site_metadata().unwrap();
    let doc = blog
        .feed_builder()
        .build_feed("posts", is_production, &site)
        .await
        .unwrap();
    assert_eq!(doc.content_type, RSS_CONTENT_TYPE);
    rss::Channel::read_from(doc.body.as_bytes()).unwrap()
}

#[tokio::test]
async fn production_feed_hides_drafts() {
    let tmp = TempDir::new().unwrap();
    two_posts(tmp.path());
    let blog = blog(tmp.path());

    let channel = channel(&blog, true).await;
    assert_eq!(channel.title(), "Field Notes");
    assert_eq!(channel.description(), "Things I wrote down");
    assert_eq!(channel.items().len(), 1);

    let item = &channel.items()[0];
    assert_eq!(item.title(), Some("Hello"));
    assert_eq!(item.link(), Some("https://example.com/a/"));
    assert_eq!(item.description(), Some("The first one"));
    assert!(item.content().unwrap().contains("<h1>Hi</h1>"));
    assert!(item.pub_date().unwrap().contains("1 Jan 2024"));
}

#[tokio::test]
async fn development_feed_keeps_drafts() {
    let tmp = TempDir::new().unwrap();
    two_posts(tmp.path());
    let blog = blog(tmp.path());

    let channel = channel(&blog, false).await;
    let titles: Vec<_> = channel.items().iter().filter_map(|i| i.title()).collect();
    assert_eq!(titles, vec!["Hello", "Secret"]);
    let links: Vec<_> = channel.items().iter().filter_map(|i| i.link()).collect();
    assert_eq!(links, vec!["https://example.com/a/", "https://example.com/b/"]);
}

#[tokio::test]
async fn feed_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    two_posts(tmp.path());
    let blog = blog(tmp.path());
    let site = blog.config.site_metadata().unwrap();
    let feed = blog.feed_builder();

    for is_production in [true, false] {
        let first = feed.build_feed("posts", is_production, &site).await.unwrap();
        let second = feed.build_feed("posts", is_production, &site).await.unwrap();
        assert_eq!(first.body, second.body);
    }
}

#[tokio::test]
async fn omitted_fields_get_defaults() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "content/posts/plain.md",
        "---\ntitle: Plain\ndescription: No extras\ndate: 2024-03-01\n---\n",
    );
    let blog = blog(tmp.path());

    let entries = blog.loader().load_collection("posts").unwrap();
    assert!(!entries[0].data.draft());
    assert_eq!(entries[0].data.image(), Some("/static/blog-placeholder.png"));

    // Without a draft flag the entry is published in production
    assert_eq!(channel(&blog, true).await.items().len(), 1);
}

#[tokio::test]
async fn undeclared_collection_fails() {
    let tmp = TempDir::new().unwrap();
    two_posts(tmp.path());
    let blog = blog(tmp.path());
    let site = blog.config.site_metadata().unwrap();

    let err = blog
        .feed_builder()
        .build_feed("drafts", true, &site)
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::CollectionNotFound(name) if name == "drafts"));
}

#[tokio::test]
async fn invalid_entry_aborts_feed() {
    let tmp = TempDir::new().unwrap();
    two_posts(tmp.path());
    // A draft with a broken date still fails the production feed
    write(
        tmp.path(),
        "content/posts/C.md",
        "---\ntitle: Broken\ndescription: d\ndate: someday\ndraft: true\n---\n",
    );
    let blog = blog(tmp.path());
    let site = blog.config.site_metadata().unwrap();

    let err = blog
        .feed_builder()
        .build_feed("posts", true, &site)
        .await
        .unwrap_err();
    match err {
        FeedError::Content(ContentError::Validation(SchemaValidationError {
            entry,
            field,
            issue,
            ..
        })) => {
            assert_eq!(entry, "C.md");
            assert_eq!(field, "date");
            assert!(matches!(issue, ValidationIssue::InvalidType { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn build_writes_feed_file() {
    let tmp = TempDir::new().unwrap();
    two_posts(tmp.path());
    let blog = blog(tmp.path());

    let output = blog.build(true).await.unwrap();
    assert_eq!(output, tmp.path().join("public/rss.xml"));

    let xml = fs::read_to_string(output).unwrap();
    assert!(xml.contains("Hello"));
    assert!(!xml.contains("Secret"));
}

#[tokio::test]
async fn out_of_range_date_is_a_validation_error() {
    for date in ["999999999999999", "-62198755200000"] {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "content/posts/far.md",
            &format!("---\ntitle: Far\ndescription: d\ndate: {}\n---\n", date),
        );
        let blog = blog(tmp.path());
        let site = blog.config.site_metadata().unwrap();

        let err = blog
            .feed_builder()
            .build_feed("posts", true, &site)
            .await
            .unwrap_err();
        assert!(
            matches!(
                &err,
                FeedError::Content(ContentError::Validation(e)) if e.field == "date"
            ),
            "unexpected error for {date}: {err}"
        );
    }
}
