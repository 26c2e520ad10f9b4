//! Crawler module for turning a website into page records
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-request timeouts
//! - HTML text, media and link extraction
//! - Dynamic JSON endpoint discovery and harvesting
//! - Word-count chunking
//! - Frontier batching and overall crawl coordination

mod chunker;
mod coordinator;
mod endpoints;
mod fetcher;
mod page;
mod parser;
mod scheduler;
mod visited;

pub use chunker::{chunk_text, DEFAULT_CHUNK_SIZE};
pub use coordinator::{run_crawl, Coordinator};
pub use endpoints::{collect_json_text, discover_endpoints, fetch_endpoint_texts};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use page::{AdmissionHook, PageCrawler, PageOutcome, PageRecord};
pub use parser::{parse_html, MediaLink, ParsedPage};
pub use scheduler::{FrontierEntry, Scheduler};
pub use visited::{Admission, VisitedSet};

use crate::config::Config;
use crate::CorpusError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Seed the frontier with the start URL at depth 0
/// 3. Crawl pages in concurrent batches until the budget or frontier runs out
/// 4. Return the page records in batch order
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Vec<PageRecord>)` - Crawl completed (possibly with zero pages)
/// * `Err(CorpusError)` - Crawl could not start
pub async fn crawl(config: Config) -> Result<Vec<PageRecord>, CorpusError> {
    run_crawl(config).await
}

/// Crawls `start_url` with the default budget (10 pages, depth 2, concurrency 10)
pub async fn crawl_site(start_url: &str) -> Result<Vec<PageRecord>, CorpusError> {
    run_crawl(Config::new(start_url)).await
}
