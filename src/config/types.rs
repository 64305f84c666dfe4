use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Webtome
///
/// Every section and field has a default, so an absent configuration file
/// (or an empty one) yields a fully usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Starting page URL; may instead be supplied on the command line
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Whether to follow links beyond the seed page
    #[serde(default)]
    pub crawl: bool,

    /// Maximum number of pages fetched in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Concurrency ceiling for per-page image fetches
    #[serde(rename = "asset-concurrency", default = "default_asset_concurrency")]
    pub asset_concurrency: usize,

    /// Timeout for a page fetch (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Timeout for an image fetch (milliseconds)
    #[serde(rename = "asset-timeout-ms", default = "default_asset_timeout_ms")]
    pub asset_timeout_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// URL admission rules
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    /// Patterns whose matches are never crawled; wins over include
    #[serde(default)]
    pub exclude: Vec<String>,

    /// When non-empty, only matching URLs are crawled
    #[serde(default)]
    pub include: Vec<String>,
}

/// Content extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentConfig {
    /// CSS selector for the content root; probed conventions apply when unset
    #[serde(default)]
    pub selector: Option<String>,

    /// CSS selectors for elements to drop from extracted content
    #[serde(rename = "exclude-selectors", default)]
    pub exclude_selectors: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the rendered document is written under
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

fn default_max_pages() -> usize {
    10
}

fn default_asset_concurrency() -> usize {
    8
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_asset_timeout_ms() -> u64 {
    15_000
}

fn default_user_agent() -> String {
    "webtome/1.0".to_string()
}

fn default_output_directory() -> String {
    "./books".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            crawl: false,
            max_pages: default_max_pages(),
            asset_concurrency: default_asset_concurrency(),
            request_timeout_ms: default_request_timeout_ms(),
            asset_timeout_ms: default_asset_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.crawler.crawl);
        assert_eq!(config.crawler.max_pages, 10);
        assert_eq!(config.crawler.asset_concurrency, 8);
        assert_eq!(config.crawler.request_timeout_ms, 30_000);
        assert_eq!(config.crawler.asset_timeout_ms, 15_000);
        assert!(config.rules.exclude.is_empty());
        assert!(config.rules.include.is_empty());
        assert!(config.content.selector.is_none());
        assert_eq!(config.output.directory, "./books");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.crawler.max_pages, 10);
        assert_eq!(config.crawler.user_agent, "webtome/1.0");
    }

    #[test]
    fn test_timeout_helpers() {
        let config = CrawlerConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.asset_timeout(), Duration::from_secs(15));
    }
}
