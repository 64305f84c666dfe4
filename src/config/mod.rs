//! Configuration module for Webtome
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every field has a default, so configuration is optional: a run
//! with nothing but a seed URL uses the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use webtome::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webtome.toml")).unwrap();
//! println!("Page budget: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ContentConfig, CrawlerConfig, OutputConfig, RulesConfig};

// Re-export parser functions
pub use parser::load_config;

// Re-export validation for callers that build a Config programmatically
pub use validation::validate;
