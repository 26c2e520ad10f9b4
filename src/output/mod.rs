//! Output module for handing crawl results to an indexer
//!
//! This module handles:
//! - The `{ url, pages }` JSON document consumed by the upload step
//! - Crawl statistics for logging

pub mod stats;

pub use stats::{log_statistics, CrawlStatistics};

use crate::crawler::PageRecord;
use crate::CorpusError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable result of one crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlOutput {
    /// The start URL of the crawl
    pub url: String,

    /// Page records in crawl order
    pub pages: Vec<PageRecord>,
}

impl CrawlOutput {
    pub fn new(url: impl Into<String>, pages: Vec<PageRecord>) -> Self {
        Self {
            url: url.into(),
            pages,
        }
    }

    /// Renders the document as JSON
    pub fn to_json(&self, pretty: bool) -> Result<String, CorpusError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Writes the document as JSON to `path`
    pub fn write_json(&self, path: &Path, pretty: bool) -> Result<(), CorpusError> {
        std::fs::write(path, self.to_json(pretty)?)?;
        tracing::info!("Wrote {} pages to {}", self.pages.len(), path.display());
        Ok(())
    }
}
