//! Crawl rule compilation and matching
//!
//! Rules come in from the CLI or config file as plain strings and are
//! compiled once into one of three match modes:
//! - exact equality, for patterns that are full absolute URLs
//! - glob matching anchored at the start of the URL, for patterns that
//!   contain `*` or `?`
//! - substring containment, for bare wildcard-free literals
//!
//! Substring matching deliberately does NOT apply to full absolute URLs, so
//! that excluding `https://example.com/` does not reject every deeper path
//! on the site.

use crate::ConfigError;
use regex::Regex;

/// A single compiled crawl rule
#[derive(Debug, Clone)]
pub enum CrawlRule {
    /// Full-URL pattern matched by exact string equality
    Exact(String),

    /// Wildcard pattern compiled to a regex anchored at the start of the URL
    Glob { pattern: String, matcher: Regex },

    /// Bare literal matched by substring containment
    Substring(String),
}

impl CrawlRule {
    /// Compiles a pattern string into a rule
    ///
    /// Patterns containing `*` or `?` become glob rules: `*` matches any
    /// sequence, `?` matches a single character, and the match is anchored
    /// at the start of the candidate URL. `*/tag/*` therefore rejects
    /// `https://example.com/tag/news` but not `https://example.com/article`.
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "rule pattern cannot be empty".to_string(),
            ));
        }

        if pattern.contains('*') || pattern.contains('?') {
            let escaped = regex::escape(pattern)
                .replace(r"\*", ".*")
                .replace(r"\?", ".");
            let matcher = Regex::new(&format!("^{}", escaped)).map_err(|e| {
                ConfigError::InvalidPattern(format!("cannot compile '{}': {}", pattern, e))
            })?;
            Ok(Self::Glob {
                pattern: pattern.to_string(),
                matcher,
            })
        } else if pattern.starts_with("http://") || pattern.starts_with("https://") {
            Ok(Self::Exact(pattern.to_string()))
        } else {
            Ok(Self::Substring(pattern.to_string()))
        }
    }

    /// Returns true if this rule matches the given URL string
    ///
    /// Known sharp edge, preserved on purpose: substring rules match URL
    /// segments anywhere in the string, so excluding `news` also excludes
    /// `/newsletter/`. Use a glob like `*/news/*` for precise matching.
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Glob { matcher, .. } => matcher.is_match(url),
            Self::Substring(literal) => url.contains(literal.as_str()),
        }
    }

    /// The original pattern string this rule was compiled from
    pub fn pattern(&self) -> &str {
        match self {
            Self::Exact(pattern) => pattern,
            Self::Glob { pattern, .. } => pattern,
            Self::Substring(literal) => literal,
        }
    }
}

/// An ordered set of compiled crawl rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CrawlRule>,
}

impl RuleSet {
    /// Compiles a list of pattern strings into a rule set
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let rules = patterns
            .iter()
            .map(|p| CrawlRule::compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Returns true if no rules are present
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if any rule matches the URL
    pub fn matches(&self, url: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(url))
    }
}
