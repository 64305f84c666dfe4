//! URL handling module for webtome
//!
//! This module decides which discovered URLs are admitted into the crawl:
//! domain scoping against the seed, exclude/include rule evaluation, and a
//! fixed denylist of non-document file extensions.

mod normalize;
mod rules;

pub use normalize::{normalize_seed, resolve_link};
pub use rules::{CrawlRule, RuleSet};

use url::Url;

/// File extensions that never point at a document page
///
/// Fixed denylist, not configurable: images, archives, media, scripts,
/// styles and data files are rejected outright at link-discovery time.
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".zip", ".mp4", ".mp3", ".css", ".js", ".xml",
    ".json", ".svg", ".ico", ".webp", ".bmp", ".doc", ".docx",
];

/// The scheme+host scope derived from the seed URL
///
/// All crawled pages must match the seed's scheme, host and port exactly;
/// subdomains are different hosts and therefore out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl DomainScope {
    /// Derives the scope from a seed URL
    pub fn from_seed(seed: &Url) -> Self {
        Self {
            scheme: seed.scheme().to_string(),
            host: seed.host_str().unwrap_or_default().to_string(),
            port: seed.port(),
        }
    }

    /// Returns true if the URL lies within this scope
    pub fn contains(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.host_str().unwrap_or_default() == self.host
            && url.port() == self.port
    }

    /// The scope rendered as `scheme://host[:port]`, for logging
    pub fn origin(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }
}

/// Decides whether a discovered URL is admitted into the crawl
///
/// Evaluation order:
/// 1. Reject anything outside the domain scope.
/// 2. Reject if any exclude rule matches; exclusion has priority over
///    inclusion and short-circuits.
/// 3. If include rules exist, require at least one to match. An empty
///    include set admits all domain-scoped, non-excluded URLs.
/// 4. Reject paths with a known non-document file extension.
///
/// Pure function: identical inputs always produce identical output.
pub fn admit(url: &Url, exclude: &RuleSet, include: &RuleSet, scope: &DomainScope) -> bool {
    if !scope.contains(url) {
        return false;
    }

    let candidate = url.as_str();

    if exclude.matches(candidate) {
        return false;
    }

    if !include.is_empty() && !include.matches(candidate) {
        return false;
    }

    has_document_path(url)
}

/// Returns true unless the URL path ends in a known non-document extension
fn has_document_path(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    !NON_DOCUMENT_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext))
}
