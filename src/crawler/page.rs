//! Single-page crawl: admission, fetch, extraction, chunking, link enumeration

use crate::config::Config;
use crate::crawler::chunker::chunk_text;
use crate::crawler::endpoints::{discover_endpoints, fetch_endpoint_texts};
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{parse_html, MediaLink};
use crate::crawler::scheduler::FrontierEntry;
use crate::crawler::visited::{Admission, VisitedSet};
use crate::url::{is_internal, is_login_page, is_tracking_url};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Structured output for one successfully crawled URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The URL as it was admitted (before redirects)
    pub url: String,

    /// Page text split into fixed-size word chunks
    pub chunks: Vec<String>,

    /// Linked PDF documents
    pub pdfs: Vec<MediaLink>,

    /// Embedded images
    pub images: Vec<MediaLink>,
}

/// A crawled page and the internal links it points to
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// The record to append to the crawl result
    pub record: PageRecord,

    /// Internal anchor targets at `depth + 1`, not deduplicated
    pub next_links: Vec<FrontierEntry>,
}

/// Callback invoked for every entry that passes admission
pub type AdmissionHook = Arc<dyn Fn(&FrontierEntry) + Send + Sync>;

/// Crawls individual pages on behalf of the coordinator
///
/// The only state shared between concurrent `crawl` calls is the visited set.
pub struct PageCrawler {
    config: Arc<Config>,
    client: Client,
    start_url: String,
    visited: VisitedSet,
    admission_hook: Option<AdmissionHook>,
}

impl PageCrawler {
    pub fn new(config: Arc<Config>, client: Client, start_url: String, visited: VisitedSet) -> Self {
        Self {
            config,
            client,
            start_url,
            visited,
            admission_hook: None,
        }
    }

    pub fn set_admission_hook(&mut self, hook: AdmissionHook) {
        self.admission_hook = Some(hook);
    }

    /// Processes a single frontier entry
    ///
    /// This method:
    /// 1. Checks depth, login/tracking filters, the visited set and the page budget
    /// 2. Fetches the page
    /// 3. Extracts static text and media, then text from dynamic endpoints
    /// 4. Chunks the combined text
    /// 5. Lists internal links for the next hop
    ///
    /// Returns None if the entry was not admitted or the fetch failed. An
    /// admitted URL stays in the visited set either way.
    pub async fn crawl(&self, entry: FrontierEntry) -> Option<PageOutcome> {
        if !self.admit(&entry) {
            return None;
        }

        let page_url = match Url::parse(&entry.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Dropping {}: invalid URL: {}", entry.url, e);
                return None;
            }
        };

        let timeout = Duration::from_secs(self.config.http.page_timeout_secs);
        let body = match fetch_url(&self.client, page_url.as_str(), timeout).await {
            FetchResult::Success {
                body, content_type, ..
            } => {
                if is_binary(&content_type) {
                    tracing::debug!("Dropping {}: binary content ({})", entry.url, content_type);
                    return None;
                }
                body
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Dropping {}: HTTP {}", entry.url, status_code);
                return None;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Dropping {}: {}", entry.url, error);
                return None;
            }
        };

        let extract = &self.config.extract;
        let parsed = parse_html(&body, &page_url, extract.min_paragraph_words);

        let endpoints = if extract.max_endpoints_per_page > 0 {
            discover_endpoints(&body, &page_url)
        } else {
            Vec::new()
        };
        if !endpoints.is_empty() {
            tracing::debug!("Found {} dynamic endpoints on {}", endpoints.len(), entry.url);
        }
        let endpoint_texts =
            fetch_endpoint_texts(&self.client, endpoints, &self.config.http, extract).await;

        let mut fragments = Vec::with_capacity(endpoint_texts.len() + 1);
        fragments.push(parsed.text);
        fragments.extend(endpoint_texts);
        let text = fragments.join("\n");
        let chunks = chunk_text(text.trim(), extract.chunk_size);

        let next_links = parsed
            .links
            .into_iter()
            .map(String::from)
            .filter(|link| is_internal(&self.start_url, link))
            .map(|link| FrontierEntry::new(link, entry.depth + 1))
            .collect();

        tracing::debug!("Crawled {} ({} chunks)", entry.url, chunks.len());

        Some(PageOutcome {
            record: PageRecord {
                url: entry.url,
                chunks,
                pdfs: parsed.pdfs,
                images: parsed.images,
            },
            next_links,
        })
    }

    /// Decides whether an entry may be fetched, marking it visited if so
    fn admit(&self, entry: &FrontierEntry) -> bool {
        let crawl = &self.config.crawl;

        if entry.depth > crawl.max_depth {
            tracing::trace!("Skipping {}: depth {} exceeds limit", entry.url, entry.depth);
            return false;
        }

        if is_login_page(&entry.url) {
            tracing::debug!("Skipping login page {}", entry.url);
            return false;
        }

        if is_tracking_url(&entry.url) {
            tracing::debug!("Skipping tracking URL {}", entry.url);
            return false;
        }

        match self.visited.try_admit(&entry.url, crawl.max_pages) {
            Admission::Admitted => {}
            Admission::AlreadyVisited => return false,
            Admission::BudgetExhausted => {
                tracing::trace!("Skipping {}: page budget spent", entry.url);
                return false;
            }
        }

        if let Some(hook) = &self.admission_hook {
            hook(entry);
        }

        true
    }
}

/// Media types whose bodies are never page text
const BINARY_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/octet-stream",
    "application/zip",
    "image/",
    "audio/",
    "video/",
    "font/",
];

fn is_binary(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    BINARY_CONTENT_TYPES
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
}
