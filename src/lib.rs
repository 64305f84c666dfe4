//! Webtome: stitch related web pages into a single offline book
//!
//! This crate crawls same-site pages breadth-first from a seed URL, extracts
//! the main content of each page together with its images, and assembles the
//! results into one ordered document with a shared asset namespace, ready for
//! format-specific renderers.

pub mod config;
pub mod crawler;
pub mod document;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for webtome operations
#[derive(Debug, Error)]
pub enum WebtomeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed page unreachable: {url}: {source}")]
    SeedUnreachable {
        url: String,
        source: crawler::FetchError,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid crawl rule pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for webtome operations
pub type Result<T> = std::result::Result<T, WebtomeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlController, CrawlState, HttpPageFetcher, PageFetcher};
pub use document::{BookMetadata, ChapterRecord, Document, FetchedAsset};
pub use url::{admit, CrawlRule, DomainScope, RuleSet};
