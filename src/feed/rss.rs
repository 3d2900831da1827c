//! RSS 2.0 serialization

use chrono::Datelike;
use rss::{validation::Validate, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::collections::BTreeMap;

use super::{FeedError, FeedItem, SiteMetadata};

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// Serialize `items` into an RSS 2.0 document.
///
/// Item links are resolved against the site URL. The output depends only
/// on its inputs, so the same items always produce the same bytes.
pub fn to_rss(site: &SiteMetadata, items: &[FeedItem]) -> Result<String, FeedError> {
    let items = items
        .iter()
        .map(|item| to_rss_item(site, item))
        .collect::<Result<Vec<_>, _>>()?;

    let namespaces = BTreeMap::from([("content".to_string(), CONTENT_NAMESPACE.to_string())]);

    let channel = ChannelBuilder::default()
        .namespaces(namespaces)
        .title(strip_invalid_xml_chars(&site.title))
        .link(site.site.to_string())
        .description(strip_invalid_xml_chars(&site.description))
        .generator(format!("blog-rs {}", env!("CARGO_PKG_VERSION")))
        .items(items)
        .build();

    channel.validate()?;

    let xml = channel.write_to(Vec::new())?;
    Ok(String::from_utf8_lossy(&xml).into_owned())
}

fn to_rss_item(site: &SiteMetadata, item: &FeedItem) -> Result<Item, FeedError> {
    let link = site
        .site
        .join(&item.link)
        .map_err(|source| FeedError::InvalidLink {
            link: item.link.clone(),
            site: site.site.clone(),
            source,
        })?
        .to_string();

    // chrono only formats RFC 2822 for four-digit years
    let pub_date = match item.pub_date {
        Some(date) if !(0..=9999).contains(&date.year()) => {
            return Err(FeedError::UnrepresentableDate {
                link: item.link.clone(),
                date,
            })
        }
        date => date.map(|d| d.to_rfc2822()),
    };

    Ok(ItemBuilder::default()
        .title(item.title.as_deref().map(strip_invalid_xml_chars))
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .pub_date(pub_date)
        .description(item.description.as_deref().map(strip_invalid_xml_chars))
        .content(Some(strip_invalid_xml_chars(&item.content)))
        .build())
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use url::Url;

    fn site() -> SiteMetadata {
        SiteMetadata {
            title: "Field Notes".to_string(),
            description: "Things I wrote down".to_string(),
            site: Url::parse("https://example.com/").unwrap(),
        }
    }

    fn item(slug: &str) -> FeedItem {
        FeedItem {
            link: format!("/{}/", slug),
            title: Some("Hello & welcome".to_string()),
            description: Some("First post".to_string()),
            pub_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            content: "<p>Hi<span>\u{0}</span></p>".to_string(),
        }
    }

    #[test]
    fn test_channel_metadata() {
        let xml = to_rss(&site(), &[]).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.title(), "Field Notes");
        assert_eq!(channel.description(), "Things I wrote down");
        assert_eq!(channel.link(), "https://example.com/");
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_item_fields() {
        let xml = to_rss(&site(), &[item("hello")]).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let item = &channel.items()[0];

        assert_eq!(item.link(), Some("https://example.com/hello/"));
        assert_eq!(item.guid().map(|g| g.value()), Some("https://example.com/hello/"));
        assert_eq!(item.title(), Some("Hello & welcome"));
        assert_eq!(item.description(), Some("First post"));
        assert_eq!(item.content(), Some("<p>Hi<span></span></p>"));
        assert_eq!(item.pub_date(), Some("Mon, 1 Jan 2024 00:00:00 +0000"));
    }

    #[test]
    fn test_links_resolve_from_site_root() {
        let mut site = site();
        site.site = Url::parse("https://example.com/blog/").unwrap();
        let xml = to_rss(&site, &[item("a")]).unwrap();
        assert!(xml.contains("<link>https://example.com/a/</link>"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let items = vec![item("a"), item("b")];
        assert_eq!(
            to_rss(&site(), &items).unwrap(),
            to_rss(&site(), &items).unwrap()
        );
    }

    #[test]
    fn test_far_future_date_is_an_error() {
        let mut far = item("far");
        far.pub_date = DateTime::<Utc>::from_timestamp_millis(999_999_999_999_999);

        let err = to_rss(&site(), &[item("a"), far]).unwrap_err();
        assert!(matches!(err, FeedError::UnrepresentableDate { link, .. } if link == "/far/"));
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{1}b\tc\n"), "ab\tc\n");
    }
}
