//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that:
//! - Seeds the frontier with the start URL
//! - Dispatches bounded-size batches of page crawls concurrently
//! - Collects page records and feeds discovered links back into the frontier
//! - Stops when the frontier drains or the page budget is spent

use crate::config::{validate, Config};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::page::{AdmissionHook, PageCrawler, PageRecord};
use crate::crawler::scheduler::{FrontierEntry, Scheduler};
use crate::crawler::visited::VisitedSet;
use crate::url::strip_fragment;
use crate::CorpusError;
use futures::future::join_all;
use std::sync::Arc;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    pages: PageCrawler,
    scheduler: Scheduler,
    visited: VisitedSet,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration; validated here
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CorpusError)` - Invalid configuration or HTTP client build failure
    pub fn new(config: Config) -> Result<Self, CorpusError> {
        validate(&config)?;

        // Parse once so "https://a.com" and back-links to "https://a.com/" agree
        let start_url = strip_fragment(Url::parse(&config.crawl.start_url)?).to_string();

        let client = build_http_client(&config.http)?;
        let visited = VisitedSet::new();
        let config = Arc::new(config);

        let scheduler = Scheduler::new(
            FrontierEntry::new(start_url.clone(), 0),
            config.crawl.concurrency,
        );
        let pages = PageCrawler::new(Arc::clone(&config), client, start_url, visited.clone());

        Ok(Self {
            config,
            pages,
            scheduler,
            visited,
        })
    }

    /// Registers a callback invoked for every admitted frontier entry
    pub fn with_admission_hook(mut self, hook: AdmissionHook) -> Self {
        self.pages.set_admission_hook(hook);
        self
    }

    /// Runs the main crawl loop
    ///
    /// Each batch is awaited as a whole before the next one is dispatched, so
    /// records come back in batch order with input order inside a batch.
    pub async fn run(mut self) -> Vec<PageRecord> {
        let max_pages = self.config.crawl.max_pages;
        tracing::info!(
            "Starting crawl of {} (max pages {}, max depth {}, concurrency {})",
            self.config.crawl.start_url,
            max_pages,
            self.config.crawl.max_depth,
            self.config.crawl.concurrency
        );

        let start_time = std::time::Instant::now();
        let mut records = Vec::new();
        let mut batches = 0usize;

        while !self.scheduler.is_empty() && self.visited.len() < max_pages {
            let batch = self.scheduler.next_batch();
            batches += 1;

            let pages = &self.pages;
            let outcomes = join_all(batch.into_iter().map(|entry| pages.crawl(entry))).await;

            let mut pending = Vec::new();
            for outcome in outcomes.into_iter().flatten() {
                records.push(outcome.record);
                pending.extend(
                    outcome
                        .next_links
                        .into_iter()
                        .filter(|link| !self.visited.contains(&link.url)),
                );
            }
            self.scheduler.extend(pending);

            tracing::info!(
                "Progress: batch {}, {} pages collected, {} visited, {} in frontier",
                batches,
                records.len(),
                self.visited.len(),
                self.scheduler.frontier_size()
            );
        }

        tracing::info!(
            "Crawl completed: {} pages collected in {:?}",
            records.len(),
            start_time.elapsed()
        );

        records
    }
}

/// Runs a complete crawl for the given configuration
///
/// # Example
///
/// ```no_run
/// use sumi_corpus::config::Config;
/// use sumi_corpus::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pages = run_crawl(Config::new("https://example.com/")).await?;
/// println!("Collected {} pages", pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<Vec<PageRecord>, CorpusError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
