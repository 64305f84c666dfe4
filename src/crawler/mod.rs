//! Crawler module for Webtome
//!
//! Everything between a seed URL and an assembled document: page fetching,
//! link discovery, content and metadata extraction, image fetching, and the
//! controller that drives them breadth-first under a page budget.

mod assets;
mod controller;
mod extractor;
mod fetcher;
mod metadata;
mod parser;

pub use assets::AssetFetcher;
pub use controller::{CrawlController, CrawlState};
pub use extractor::{ContentExtractor, ExtractedContent};
pub use fetcher::{build_http_client, FetchError, HttpPageFetcher, PageFetcher};
pub use metadata::{HtmlMetadataExtractor, MetadataExtractor};
pub use parser::discover_links;

use crate::config::Config;
use crate::document::{assemble, Document};
use crate::Result;
use url::Url;

/// Crawls from a seed URL and assembles the result into a document
///
/// Convenience entry point wiring the HTTP fetcher, the asset fetcher, and
/// the controller together from one configuration.
pub async fn crawl(config: Config, seed: Url) -> Result<Document> {
    let client = build_http_client(&config.crawler.user_agent)?;
    let fetcher = HttpPageFetcher::new(client.clone(), config.crawler.request_timeout());
    let assets = AssetFetcher::new(
        client,
        config.crawler.asset_concurrency,
        config.crawler.asset_timeout(),
    );

    let mut controller = CrawlController::new(config, seed, fetcher, assets)?;
    let (metadata, records) = controller.run().await?;

    Ok(assemble(metadata, records))
}
