//! Link resolution and frontier normalization
//!
//! Every URL that enters the frontier goes through [`resolve_link`]: hrefs
//! are resolved to absolute form against the page they were found on,
//! non-navigable schemes are dropped, and fragments are stripped so that
//! `/page#a` and `/page#b` dedup to the same frontier entry.

use url::Url;

/// Resolves an href to an absolute, fragment-free URL against a base page
///
/// Returns None for links that can never become frontier entries:
/// - empty hrefs and same-page fragment anchors
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - hrefs that fail to resolve, or resolve to a non-HTTP(S) scheme
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

/// Parses and normalizes a seed URL supplied by the caller
///
/// The seed must be absolute with an http or https scheme; its fragment is
/// stripped the same way discovered links are.
pub fn normalize_seed(seed: &str) -> Result<Url, crate::ConfigError> {
    let mut url = Url::parse(seed)
        .map_err(|e| crate::ConfigError::InvalidUrl(format!("'{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(crate::ConfigError::InvalidUrl(format!(
            "'{}': only http and https schemes are supported",
            seed
        )));
    }

    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/section/page").unwrap()
    }

    #[test]
    fn test_resolve_relative() {
        let url = resolve_link(&base(), "/other").unwrap();
        assert_eq!(url.as_str(), "https://example.com/other");
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = resolve_link(&base(), "sibling").unwrap();
        assert_eq!(url.as_str(), "https://example.com/section/sibling");
    }

    #[test]
    fn test_resolve_absolute() {
        let url = resolve_link(&base(), "https://other.com/page").unwrap();
        assert_eq!(url.as_str(), "https://other.com/page");
    }

    #[test]
    fn test_fragment_stripped() {
        let url = resolve_link(&base(), "/page#section-2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_fragment_only_dropped() {
        assert!(resolve_link(&base(), "#top").is_none());
    }

    #[test]
    fn test_special_schemes_dropped() {
        assert!(resolve_link(&base(), "javascript:void(0)").is_none());
        assert!(resolve_link(&base(), "mailto:a@example.com").is_none());
        assert!(resolve_link(&base(), "tel:+123456").is_none());
        assert!(resolve_link(&base(), "data:text/html,hi").is_none());
    }

    #[test]
    fn test_empty_href_dropped() {
        assert!(resolve_link(&base(), "").is_none());
        assert!(resolve_link(&base(), "   ").is_none());
    }

    #[test]
    fn test_non_http_scheme_after_resolution() {
        assert!(resolve_link(&base(), "ftp://example.com/file").is_none());
    }

    #[test]
    fn test_normalize_seed_strips_fragment() {
        let url = normalize_seed("https://example.com/page#intro").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_normalize_seed_rejects_bad_scheme() {
        assert!(normalize_seed("ftp://example.com/").is_err());
        assert!(normalize_seed("not a url").is_err());
    }
}
