//! Page metadata extraction
//!
//! Derives book-level metadata from the first successfully fetched page.
//! Every field has a graded fallback chain ending in a default, so
//! extraction always succeeds.

use crate::document::BookMetadata;
use chrono::Utc;
use scraper::{Html, Selector};
use url::Url;

/// Sequences that conventionally separate a page title from a site name
const TITLE_SEPARATORS: &[&str] = &[" | ", " \u{2022} ", " \u{00b7} ", " - ", " \u{2013} ", " \u{2014} "];

/// Derives document metadata from a parsed page
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, document: &Html, page_url: &Url) -> BookMetadata;
}

/// Metadata extraction from standard HTML conventions: Open Graph and
/// Twitter card tags, meta elements, and structural fallbacks
#[derive(Debug, Default, Clone)]
pub struct HtmlMetadataExtractor;

impl MetadataExtractor for HtmlMetadataExtractor {
    fn extract(&self, document: &Html, page_url: &Url) -> BookMetadata {
        BookMetadata {
            title: extract_title(document),
            author: extract_author(document),
            description: extract_description(document),
            publisher: extract_publisher(document, page_url),
            date: extract_date(document),
            language: extract_language(document),
            keywords: extract_keywords(document),
            source_url: page_url.to_string(),
        }
    }
}

fn select(raw: &str) -> Selector {
    Selector::parse(raw).expect("static selector")
}

/// First non-empty content attribute among meta probes
fn meta_content(document: &Html, probes: &[&str]) -> Option<String> {
    for probe in probes {
        let selector = select(probe);
        if let Some(element) = document.select(&selector).next() {
            if let Some(content) = element.value().attr("content") {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

fn extract_title(document: &Html) -> String {
    let raw = meta_content(
        document,
        &[
            "meta[property='og:title']",
            "meta[name='twitter:title']",
        ],
    )
    .or_else(|| {
        document
            .select(&select("title"))
            .next()
            .map(|el| el.text().collect::<String>())
    })
    .or_else(|| {
        document
            .select(&select("h1"))
            .next()
            .map(|el| el.text().collect::<String>())
    })
    .unwrap_or_default();

    clean_title(&raw)
}

/// Normalizes a raw page title into a usable book title
///
/// Strips a leading bare version number, keeps only the part before the
/// first site-name separator, and collapses whitespace. An empty result
/// falls back to "Untitled Document".
fn clean_title(raw: &str) -> String {
    let mut title = raw.trim();

    // "1.2.3 Release notes" style prefixes carry no meaning in a book title
    if let Some((head, tail)) = title.split_once(char::is_whitespace) {
        if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit() || c == '.') {
            title = tail.trim_start();
        }
    }

    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep))
        .min();
    if let Some(cut) = cut {
        title = title[..cut].trim_end();
    }

    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

    if title.is_empty() {
        "Untitled Document".to_string()
    } else {
        title
    }
}

fn extract_author(document: &Html) -> String {
    meta_content(
        document,
        &[
            "meta[name='author']",
            "meta[property='article:author']",
        ],
    )
    .or_else(|| {
        document
            .select(&select("[class~='author']"))
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    })
    .unwrap_or_else(|| "Unknown Author".to_string())
}

fn extract_description(document: &Html) -> String {
    meta_content(
        document,
        &[
            "meta[name='description']",
            "meta[property='og:description']",
        ],
    )
    .unwrap_or_default()
}

fn extract_publisher(document: &Html, page_url: &Url) -> String {
    meta_content(document, &["meta[property='og:site_name']"])
        .or_else(|| page_url.host_str().map(|host| host.to_string()))
        .unwrap_or_default()
}

fn extract_date(document: &Html) -> String {
    meta_content(document, &["meta[property='article:published_time']"])
        .or_else(|| {
            document
                .select(&select("time[datetime]"))
                .next()
                .and_then(|el| el.value().attr("datetime"))
                .map(|datetime| datetime.trim().to_string())
                .filter(|datetime| !datetime.is_empty())
        })
        .unwrap_or_else(|| Utc::now().to_rfc3339())
}

fn extract_language(document: &Html) -> String {
    document
        .select(&select("html[lang]"))
        .next()
        .and_then(|el| el.value().attr("lang"))
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
        .or_else(|| meta_content(document, &["meta[http-equiv='content-language']"]))
        .unwrap_or_else(|| "en".to_string())
}

fn extract_keywords(document: &Html) -> String {
    meta_content(document, &["meta[name='keywords']"]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> BookMetadata {
        let document = Html::parse_document(html);
        let url = Url::parse("https://books.example.org/guide/intro").unwrap();
        HtmlMetadataExtractor.extract(&document, &url)
    }

    #[test]
    fn test_og_title_preferred() {
        let meta = extract(
            r#"<html><head>
            <meta property="og:title" content="The Real Title">
            <title>Browser Tab Title</title>
            </head><body><h1>Heading</h1></body></html>"#,
        );
        assert_eq!(meta.title, "The Real Title");
    }

    #[test]
    fn test_title_element_fallback() {
        let meta = extract("<html><head><title>Plain Title</title></head></html>");
        assert_eq!(meta.title, "Plain Title");
    }

    #[test]
    fn test_h1_fallback() {
        let meta = extract("<html><body><h1>Only a Heading</h1></body></html>");
        assert_eq!(meta.title, "Only a Heading");
    }

    #[test]
    fn test_title_default_when_absent() {
        let meta = extract("<html><body><p>nothing here</p></body></html>");
        assert_eq!(meta.title, "Untitled Document");
    }

    #[test]
    fn test_title_site_suffix_removed() {
        let meta = extract("<html><head><title>Deep Dive | Example News</title></head></html>");
        assert_eq!(meta.title, "Deep Dive");
    }

    #[test]
    fn test_title_version_prefix_removed() {
        let meta = extract("<html><head><title>2.1.0 Migration Guide</title></head></html>");
        assert_eq!(meta.title, "Migration Guide");
    }

    #[test]
    fn test_title_whitespace_collapsed() {
        let meta = extract("<html><head><title>  Too   much\n space  </title></head></html>");
        assert_eq!(meta.title, "Too much space");
    }

    #[test]
    fn test_author_from_meta() {
        let meta = extract(
            r#"<html><head><meta name="author" content="R. Chen"></head></html>"#,
        );
        assert_eq!(meta.author, "R. Chen");
    }

    #[test]
    fn test_author_from_class() {
        let meta = extract(
            r#"<html><body><span class="byline author">Sam Doe</span></body></html>"#,
        );
        assert_eq!(meta.author, "Sam Doe");
    }

    #[test]
    fn test_author_default() {
        let meta = extract("<html><body></body></html>");
        assert_eq!(meta.author, "Unknown Author");
    }

    #[test]
    fn test_publisher_falls_back_to_host() {
        let meta = extract("<html><body></body></html>");
        assert_eq!(meta.publisher, "books.example.org");
    }

    #[test]
    fn test_publisher_from_site_name() {
        let meta = extract(
            r#"<html><head><meta property="og:site_name" content="Example Press"></head></html>"#,
        );
        assert_eq!(meta.publisher, "Example Press");
    }

    #[test]
    fn test_date_from_time_element() {
        let meta = extract(
            r#"<html><body><time datetime="2024-03-01T10:00:00Z">March</time></body></html>"#,
        );
        assert_eq!(meta.date, "2024-03-01T10:00:00Z");
    }

    #[test]
    fn test_date_defaults_to_now() {
        let meta = extract("<html><body></body></html>");
        // RFC 3339 from chrono always carries a date and a T separator
        assert!(meta.date.contains('T'));
    }

    #[test]
    fn test_language_from_html_lang() {
        let meta = extract(r#"<html lang="fr"><body></body></html>"#);
        assert_eq!(meta.language, "fr");
    }

    #[test]
    fn test_language_default() {
        let meta = extract("<html><body></body></html>");
        assert_eq!(meta.language, "en");
    }

    #[test]
    fn test_source_url_recorded() {
        let meta = extract("<html></html>");
        assert_eq!(meta.source_url, "https://books.example.org/guide/intro");
    }

    #[test]
    fn test_clean_title_separator_bullet() {
        assert_eq!(clean_title("Chapter One \u{2022} My Site"), "Chapter One");
    }
}
