//! Crawl orchestration
//!
//! Drives a breadth-first crawl from a seed page: fetch, extract, discover,
//! repeat until the frontier drains or the page budget is spent. Page
//! failures after the seed are logged and skipped; only an unreachable seed
//! aborts the run.

use crate::config::Config;
use crate::crawler::assets::AssetFetcher;
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::metadata::{HtmlMetadataExtractor, MetadataExtractor};
use crate::crawler::parser::discover_links;
use crate::crawler::PageFetcher;
use crate::document::{BookMetadata, ChapterRecord};
use crate::url::{admit, DomainScope, RuleSet};
use crate::{Result, WebtomeError};
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Lifecycle of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Orchestrates a single crawl run against one page fetcher
pub struct CrawlController<F: PageFetcher> {
    config: Config,
    seed: Url,
    scope: DomainScope,
    exclude: RuleSet,
    include: RuleSet,
    extractor: ContentExtractor,
    metadata_extractor: HtmlMetadataExtractor,
    assets: AssetFetcher,
    fetcher: F,
    frontier: VecDeque<Url>,
    visited: HashSet<String>,
    queued: HashSet<String>,
    state: CrawlState,
}

impl<F: PageFetcher> CrawlController<F> {
    /// Builds a controller from validated configuration
    pub fn new(config: Config, seed: Url, fetcher: F, assets: AssetFetcher) -> Result<Self> {
        let exclude = RuleSet::compile(&config.rules.exclude)?;
        let include = RuleSet::compile(&config.rules.include)?;
        let extractor = ContentExtractor::new(
            config.content.selector.as_deref(),
            &config.content.exclude_selectors,
        );
        let scope = DomainScope::from_seed(&seed);

        Ok(Self {
            config,
            seed,
            scope,
            exclude,
            include,
            extractor,
            metadata_extractor: HtmlMetadataExtractor,
            assets,
            fetcher,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            queued: HashSet::new(),
            state: CrawlState::Idle,
        })
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl to completion
    ///
    /// Returns the document metadata, taken from the first page, and one
    /// chapter record per successfully processed page in fetch order.
    pub async fn run(&mut self) -> Result<(BookMetadata, Vec<ChapterRecord>)> {
        self.state = CrawlState::Running;
        tracing::info!(
            "Starting crawl of {} (budget {} pages, following links: {})",
            self.seed,
            self.config.crawler.max_pages,
            self.config.crawler.crawl
        );

        self.queued.insert(self.seed.to_string());
        self.frontier.push_back(self.seed.clone());

        let mut metadata: Option<BookMetadata> = None;
        let mut records: Vec<ChapterRecord> = Vec::new();

        // The budget counts attempted pages, so failed fetches spend it too
        while self.visited.len() < self.config.crawler.max_pages {
            let url = match self.frontier.pop_front() {
                Some(url) => url,
                None => break,
            };

            if !self.visited.insert(url.to_string()) {
                continue;
            }

            tracing::info!("Fetching page {}: {}", records.len() + 1, url);
            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    if records.is_empty() && metadata.is_none() {
                        self.state = CrawlState::Aborted;
                        return Err(WebtomeError::SeedUnreachable {
                            url: url.to_string(),
                            source: e,
                        });
                    }
                    tracing::warn!("Skipping {}: {}", url, e);
                    continue;
                }
            };

            let (record, images_task) = {
                let document = Html::parse_document(&body);

                let page_meta = self.metadata_extractor.extract(&document, &url);
                if metadata.is_none() {
                    metadata = Some(page_meta.clone());
                }

                let content = self.extractor.extract(&document, &url);

                let asset_fetcher = self.assets.clone();
                let images = content.images.clone();
                let task = tokio::spawn(async move { asset_fetcher.fetch_all(&images).await });

                // Discovery is pointless once this page fills the budget
                if self.config.crawler.crawl
                    && self.visited.len() < self.config.crawler.max_pages
                {
                    for link in discover_links(&document, &url) {
                        let key = link.to_string();
                        if self.visited.contains(&key) || self.queued.contains(&key) {
                            continue;
                        }
                        if admit(&link, &self.exclude, &self.include, &self.scope) {
                            self.queued.insert(key);
                            self.frontier.push_back(link);
                        }
                    }
                }

                let record = ChapterRecord {
                    source_url: url,
                    title: page_meta.title,
                    content: content.html,
                    images: content.images,
                    assets: Vec::new(),
                };
                (record, task)
            };

            let mut record = record;
            record.assets = match images_task.await {
                Ok(assets) => assets,
                Err(e) => {
                    tracing::warn!("Asset fetching failed for {}: {}", record.source_url, e);
                    Vec::new()
                }
            };

            records.push(record);
        }

        self.state = CrawlState::Completed;
        tracing::info!(
            "Crawl completed: {} chapters, {} URLs still queued",
            records.len(),
            self.frontier.len()
        );

        Ok((metadata.unwrap_or_default(), records))
    }
}
