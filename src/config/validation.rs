use crate::config::types::{Config, CrawlerConfig, RulesConfig};
use crate::url::{normalize_seed, RuleSet};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_rules_config(&config.rules)?;
    validate_output_directory(&config.output.directory)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(seed) = &config.seed_url {
        normalize_seed(seed)?;
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.asset_concurrency < 1 || config.asset_concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "asset-concurrency must be between 1 and 64, got {}",
            config.asset_concurrency
        )));
    }

    if config.request_timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be >= 1000, got {}",
            config.request_timeout_ms
        )));
    }

    if config.asset_timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "asset-timeout-ms must be >= 1000, got {}",
            config.asset_timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every admission pattern compiles
fn validate_rules_config(config: &RulesConfig) -> Result<(), ConfigError> {
    RuleSet::compile(&config.exclude)?;
    RuleSet::compile(&config.include)?;
    Ok(())
}

fn validate_output_directory(directory: &str) -> Result<(), ConfigError> {
    if directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}
