//! Content extraction
//!
//! Given a parsed page, isolates the main content subtree, strips
//! boilerplate and caller-excluded elements, rewrites relative links and
//! image sources to absolute form, repairs encoding mojibake in text nodes,
//! and serializes the result. Extraction never fails on malformed markup;
//! at worst it yields a near-empty tree, which is a valid degenerate result.

use crate::document::ImageRef;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements removed unconditionally before any content probing
const STRIP_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript",
];

/// Conventional content containers, probed in priority order after the
/// caller-supplied selector, short-circuiting on first match
const CONTENT_PROBES: &[&str] = &[
    "#content",
    "div[class*='content' i], section[class*='content' i], main[class*='content' i]",
    "div[class*='article' i], section[class*='article' i]",
    "div[class*='post' i], section[class*='post' i]",
    "div[class*='entry' i], section[class*='entry' i]",
    "[role='main']",
    "main",
    "article",
    "body",
];

/// HTML void elements, serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// UTF-8 text that was decoded as Latin-1 somewhere upstream shows up as
/// these sequences; map them back to the characters they were meant to be.
const MOJIBAKE_REPAIRS: &[(&str, &str)] = &[
    ("â€™", "'"),
    ("â€˜", "'"),
    ("â€œ", "\u{201c}"),
    ("â€\u{9d}", "\u{201d}"),
    ("â€”", "\u{2014}"),
    ("â€“", "\u{2013}"),
    ("â€¢", "\u{2022}"),
    ("â€¦", "\u{2026}"),
    ("Â\u{a0}", " "),
];

/// The cleaned subtree plus the images found inside it
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Serialized markup with absolute link and image URLs
    pub html: String,

    /// Ordered (absolute image URL, alt text) pairs, document order
    pub images: Vec<ImageRef>,
}

/// Extracts the main content subtree from parsed pages
pub struct ContentExtractor {
    content_selector: Option<Selector>,
    exclude_selectors: Vec<Selector>,
}

impl ContentExtractor {
    /// Builds an extractor from caller-supplied selector strings
    ///
    /// An invalid selector is a configuration warning: it is logged and
    /// skipped, and extraction falls back to the default probe list.
    pub fn new(content_selector: Option<&str>, exclude_selectors: &[String]) -> Self {
        let content_selector = content_selector.and_then(|raw| match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!("Invalid content selector '{}': {:?}, ignoring", raw, e);
                None
            }
        });

        let exclude_selectors = exclude_selectors
            .iter()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::warn!("Invalid exclude selector '{}': {:?}, skipping", raw, e);
                    None
                }
            })
            .collect();

        Self {
            content_selector,
            exclude_selectors,
        }
    }

    /// Extracts and serializes the main content of a page
    pub fn extract(&self, document: &Html, page_url: &Url) -> ExtractedContent {
        let excluded = self.excluded_nodes(document);
        let root = self.content_root(document);

        let mut out = String::new();
        let mut images = Vec::new();

        // The body/html wrapper itself never belongs in chapter content
        let tag = root.value().name();
        if tag == "body" || tag == "html" {
            serialize_children(root, page_url, &excluded, &mut out, &mut images);
        } else {
            serialize_element(root, page_url, &excluded, &mut out, &mut images);
        }

        ExtractedContent { html: out, images }
    }

    /// Picks the content root: caller selector first, then the fixed probe
    /// list, finally the whole document
    fn content_root<'a>(&self, document: &'a Html) -> ElementRef<'a> {
        if let Some(selector) = &self.content_selector {
            if let Some(element) = document.select(selector).next() {
                return element;
            }
            tracing::debug!("Content selector matched nothing, falling back to probes");
        }

        for probe in CONTENT_PROBES {
            let selector = Selector::parse(probe).expect("static selector");
            if let Some(element) = document.select(&selector).next() {
                return element;
            }
        }

        document.root_element()
    }

    /// Collects the nodes matched by the caller's exclusion selectors
    fn excluded_nodes(&self, document: &Html) -> HashSet<NodeId> {
        let mut excluded = HashSet::new();
        for selector in &self.exclude_selectors {
            for element in document.select(selector) {
                excluded.insert(element.id());
            }
        }
        excluded
    }
}

fn serialize_element(
    element: ElementRef<'_>,
    page_url: &Url,
    excluded: &HashSet<NodeId>,
    out: &mut String,
    images: &mut Vec<ImageRef>,
) {
    let value = element.value();
    let tag = value.name();

    if STRIP_TAGS.contains(&tag) || excluded.contains(&element.id()) {
        return;
    }

    out.push('<');
    out.push_str(tag);

    for (name, attr_value) in value.attrs() {
        let rewritten = match (tag, name) {
            ("a", "href") | ("img", "src") | ("link", "href") => absolutize(page_url, attr_value),
            _ => attr_value.to_string(),
        };
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(&rewritten));
        out.push('"');
    }
    out.push('>');

    if tag == "img" {
        if let Some(src) = value.attr("src") {
            images.push(ImageRef {
                url: absolutize(page_url, src),
                alt: value.attr("alt").unwrap_or_default().to_string(),
            });
        }
    }

    if VOID_ELEMENTS.contains(&tag) {
        return;
    }

    serialize_children(element, page_url, excluded, out, images);

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn serialize_children(
    element: ElementRef<'_>,
    page_url: &Url,
    excluded: &HashSet<NodeId>,
    out: &mut String,
    images: &mut Vec<ImageRef>,
) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&escape_text(&repair_mojibake(text)));
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    serialize_element(child_element, page_url, excluded, out, images);
                }
            }
            // Comments, doctypes and processing instructions are stripped
            _ => {}
        }
    }
}

/// Rewrites a link or image reference to absolute form against the page URL
///
/// References that fail to resolve are left untouched rather than dropped.
fn absolutize(page_url: &Url, reference: &str) -> String {
    match page_url.join(reference.trim()) {
        Ok(url) => url.to_string(),
        Err(_) => reference.to_string(),
    }
}

/// Repairs known encoding-mojibake sequences in a text node
fn repair_mojibake(text: &str) -> String {
    if !text.contains('â') && !text.contains('Â') {
        return text.to_string();
    }

    let mut repaired = text.to_string();
    for (broken, fixed) in MOJIBAKE_REPAIRS {
        repaired = repaired.replace(broken, fixed);
    }
    repaired
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    fn extract(html: &str) -> ExtractedContent {
        ContentExtractor::new(None, &[]).extract(&Html::parse_document(html), &page_url())
    }

    #[test]
    fn test_strips_boilerplate_elements() {
        let result = extract(
            r#"<html><body>
            <nav>menu</nav>
            <header>top</header>
            <article><p>keep me</p><script>alert(1)</script></article>
            <footer>bottom</footer>
            </body></html>"#,
        );
        assert!(result.html.contains("keep me"));
        assert!(!result.html.contains("menu"));
        assert!(!result.html.contains("top"));
        assert!(!result.html.contains("bottom"));
        assert!(!result.html.contains("alert"));
    }

    #[test]
    fn test_article_preferred_over_body() {
        let result = extract(
            r#"<html><body>
            <div>outside</div>
            <article><p>inside</p></article>
            </body></html>"#,
        );
        assert!(result.html.contains("inside"));
        assert!(!result.html.contains("outside"));
    }

    #[test]
    fn test_content_id_preferred_over_article() {
        let result = extract(
            r#"<html><body>
            <div id="content"><p>primary</p></div>
            <article><p>secondary</p></article>
            </body></html>"#,
        );
        assert!(result.html.contains("primary"));
        assert!(!result.html.contains("secondary"));
    }

    #[test]
    fn test_content_class_probe_case_insensitive() {
        let result = extract(
            r#"<html><body>
            <div class="MainContent"><p>found</p></div>
            <div>noise</div>
            </body></html>"#,
        );
        assert!(result.html.contains("found"));
        assert!(!result.html.contains("noise"));
    }

    #[test]
    fn test_falls_back_to_body() {
        let result = extract(r#"<html><body><p>plain page</p></body></html>"#);
        assert!(result.html.contains("plain page"));
        assert!(!result.html.contains("<body"));
    }

    #[test]
    fn test_caller_content_selector_wins() {
        let extractor = ContentExtractor::new(Some("#target"), &[]);
        let document = Html::parse_document(
            r#"<html><body>
            <article><p>default</p></article>
            <div id="target"><p>chosen</p></div>
            </body></html>"#,
        );
        let result = extractor.extract(&document, &page_url());
        assert!(result.html.contains("chosen"));
        assert!(!result.html.contains("default"));
    }

    #[test]
    fn test_invalid_content_selector_falls_back() {
        let extractor = ContentExtractor::new(Some("p..["), &[]);
        let document =
            Html::parse_document(r#"<html><body><article><p>still works</p></article></body></html>"#);
        let result = extractor.extract(&document, &page_url());
        assert!(result.html.contains("still works"));
    }

    #[test]
    fn test_exclude_selectors_applied() {
        let extractor = ContentExtractor::new(None, &[".comments".to_string()]);
        let document = Html::parse_document(
            r#"<html><body><article>
            <p>post text</p>
            <div class="comments">troll content</div>
            </article></body></html>"#,
        );
        let result = extractor.extract(&document, &page_url());
        assert!(result.html.contains("post text"));
        assert!(!result.html.contains("troll content"));
    }

    #[test]
    fn test_invalid_exclude_selector_skipped() {
        let extractor = ContentExtractor::new(None, &["[[[".to_string(), ".ads".to_string()]);
        let document = Html::parse_document(
            r#"<html><body><article><p>body</p><div class="ads">buy</div></article></body></html>"#,
        );
        let result = extractor.extract(&document, &page_url());
        assert!(result.html.contains("body"));
        assert!(!result.html.contains("buy"));
    }

    #[test]
    fn test_relative_urls_absolutized() {
        let result = extract(
            r#"<html><body><article>
            <a href="/other">link</a>
            <img src="pics/cat.png" alt="cat">
            </article></body></html>"#,
        );
        assert!(result.html.contains("href=\"https://example.com/other\""));
        assert!(result
            .html
            .contains("src=\"https://example.com/blog/pics/cat.png\""));
    }

    #[test]
    fn test_images_collected_in_document_order() {
        let result = extract(
            r#"<html><body><article>
            <img src="/b.png" alt="second comes first">
            <img src="/a.png" alt="alphabet loses">
            </article></body></html>"#,
        );
        assert_eq!(
            result.images,
            vec![
                ImageRef {
                    url: "https://example.com/b.png".to_string(),
                    alt: "second comes first".to_string()
                },
                ImageRef {
                    url: "https://example.com/a.png".to_string(),
                    alt: "alphabet loses".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_images_inside_excluded_subtree_not_collected() {
        let extractor = ContentExtractor::new(None, &[".sidebar".to_string()]);
        let document = Html::parse_document(
            r#"<html><body><article>
            <img src="/keep.png">
            <div class="sidebar"><img src="/drop.png"></div>
            </article></body></html>"#,
        );
        let result = extractor.extract(&document, &page_url());
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].url, "https://example.com/keep.png");
    }

    #[test]
    fn test_comments_stripped() {
        let result = extract(
            r#"<html><body><article><p>text</p><!-- hidden note --></article></body></html>"#,
        );
        assert!(result.html.contains("text"));
        assert!(!result.html.contains("hidden note"));
    }

    #[test]
    fn test_mojibake_repaired() {
        let result = extract(
            "<html><body><article><p>itâ€™s â€œquotedâ€\u{9d} â€” done</p></article></body></html>",
        );
        assert!(result.html.contains("it's"));
        assert!(result.html.contains("\u{201c}quoted\u{201d}"));
        assert!(result.html.contains("\u{2014}"));
        assert!(!result.html.contains("â€"));
    }

    #[test]
    fn test_text_escaped() {
        let result = extract(r#"<html><body><article><p>a &lt; b &amp; c</p></article></body></html>"#);
        assert!(result.html.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_malformed_markup_is_degenerate_not_fatal() {
        let result = extract("<div><p>unclosed<div></span>chaos");
        // Lenient parse: whatever survives is acceptable
        assert!(result.html.contains("unclosed"));
    }

    #[test]
    fn test_empty_document() {
        let result = extract("");
        assert!(result.images.is_empty());
    }
}
