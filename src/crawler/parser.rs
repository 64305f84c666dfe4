//! Link discovery from parsed pages
//!
//! Pulls candidate navigation links out of a parsed page so the crawl
//! controller can run them through the URL classifier. Only `<a href>`
//! targets count; stylesheet links, scripts, images and download links are
//! never navigation.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts all candidate links from a parsed page
///
/// Links are resolved to absolute, fragment-free form against `base_url`.
/// Anchors with a `download` attribute and special-scheme hrefs
/// (`javascript:`, `mailto:`, `tel:`, `data:`) are skipped. Admission
/// decisions (domain scope, rules, extension denylist) are not made here.
pub fn discover_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    let anchor_selector = Selector::parse("a[href]").expect("static selector");
    for element in document.select(&anchor_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            if let Some(url) = resolve_link(base_url, href) {
                links.push(url);
            }
        }
    }

    links
}
