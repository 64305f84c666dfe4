//! Webtome main entry point
//!
//! Command-line interface for turning a set of related web pages into a
//! single offline book.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webtome::config::{load_config, validate, Config};
use webtome::crawler::crawl;
use webtome::output::{CoverRenderer, DocumentRenderer, SvgCoverRenderer, XhtmlRenderer};
use webtome::url::normalize_seed;

/// Webtome: stitch web pages into an offline book
///
/// Webtome fetches a page (and optionally the same-site pages it links to),
/// extracts the readable content and images from each, and writes the result
/// as a single browsable document with a table of contents and a cover.
#[derive(Parser, Debug)]
#[command(name = "webtome")]
#[command(version = "1.0.0")]
#[command(about = "Stitch web pages into an offline book", long_about = None)]
struct Cli {
    /// Seed page URL (may instead come from the configuration file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Follow same-site links beyond the seed page
    #[arg(long)]
    crawl: bool,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// URL pattern to exclude (repeatable); wins over --include
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// URL pattern to include (repeatable); when given, only matches crawl
    #[arg(long = "include", value_name = "PATTERN")]
    include: Vec<String>,

    /// CSS selector for the content root of each page
    #[arg(long, value_name = "SELECTOR")]
    content_selector: Option<String>,

    /// CSS selector for elements to drop from content (repeatable)
    #[arg(long = "exclude-selector", value_name = "SELECTOR")]
    exclude_selector: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Validate configuration and show the crawl plan without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Configuration file first, command line on top
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration after command-line overrides")?;

    let seed_raw = config
        .crawler
        .seed_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no seed URL given (pass one or set seed-url in config)"))?;
    let seed = normalize_seed(&seed_raw)?;

    if cli.dry_run {
        print_plan(&config, seed.as_str());
        return Ok(());
    }

    let document = crawl(config.clone(), seed).await?;

    let out_dir = PathBuf::from(&config.output.directory);
    let renderer = XhtmlRenderer;
    let book_path = renderer.render(&document, &out_dir)?;
    let cover_path = SvgCoverRenderer.render_cover(
        &document.metadata,
        book_path.parent().unwrap_or(&out_dir),
    )?;

    println!("Title:    {}", document.metadata.title);
    println!("Chapters: {}", document.chapters.len());
    println!("Images:   {}", document.assets.len());
    println!("Book:     {}", book_path.display());
    println!("Cover:    {}", cover_path.display());

    Ok(())
}

/// Folds command-line arguments over the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.crawler.seed_url = Some(url.clone());
    }
    if cli.crawl {
        config.crawler.crawl = true;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    config.rules.exclude.extend(cli.exclude.iter().cloned());
    config.rules.include.extend(cli.include.iter().cloned());
    if let Some(selector) = &cli.content_selector {
        config.content.selector = Some(selector.clone());
    }
    config
        .content
        .exclude_selectors
        .extend(cli.exclude_selector.iter().cloned());
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webtome=info,warn"),
            1 => EnvFilter::new("webtome=debug,info"),
            2 => EnvFilter::new("webtome=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows what a run with this configuration would do
fn print_plan(config: &Config, seed: &str) {
    println!("=== Webtome Dry Run ===\n");

    println!("Seed: {}", seed);
    println!("Crawler:");
    println!("  Follow links: {}", config.crawler.crawl);
    println!("  Page budget: {}", config.crawler.max_pages);
    println!("  Asset concurrency: {}", config.crawler.asset_concurrency);
    println!("  Page timeout: {}ms", config.crawler.request_timeout_ms);
    println!("  Asset timeout: {}ms", config.crawler.asset_timeout_ms);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nExclude patterns ({}):", config.rules.exclude.len());
    for pattern in &config.rules.exclude {
        println!("  - {}", pattern);
    }
    println!("Include patterns ({}):", config.rules.include.len());
    for pattern in &config.rules.include {
        println!("  - {}", pattern);
    }

    println!("\nContent:");
    match &config.content.selector {
        Some(selector) => println!("  Root selector: {}", selector),
        None => println!("  Root selector: (auto-detect)"),
    }
    for selector in &config.content.exclude_selectors {
        println!("  Dropping: {}", selector);
    }

    println!("\nOutput directory: {}", config.output.directory);
    println!("\n\u{2713} Configuration is valid");
}
