//! Dynamic endpoint discovery and JSON text harvesting
//!
//! Client-rendered pages often load their real content from same-origin JSON
//! endpoints. This module scans raw HTML for string literals that look like
//! such endpoints, fetches them, and walks any JSON they return for prose.

use crate::config::{ExtractConfig, HttpConfig};
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::url::resolve_href;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Quoted string literals that look like API paths
///
/// Each pattern captures the path (group 1). Markers other than `/api/` and
/// `/Course/` may appear anywhere in the path and are case-sensitive.
const ENDPOINT_PATTERN_SOURCES: &[&str] = &[
    r#"["'](/api/[^"'\s<>]*)["']"#,
    r#"["'](/[^"'\s<>]*Get[^"'\s<>]*)["']"#,
    r#"["'](/[^"'\s<>]*Fetch[^"'\s<>]*)["']"#,
    r#"["'](/[^"'\s<>]*detail[^"'\s<>]*)["']"#,
    r#"["'](/[^"'\s<>]*overview[^"'\s<>]*)["']"#,
    r#"["'](/Course/[^"'\s<>]*)["']"#,
];

static ENDPOINT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ENDPOINT_PATTERN_SOURCES
        .iter()
        .map(|source| Regex::new(source).expect("hardcoded regex pattern is valid"))
        .collect()
});

/// Finds same-origin, API-like URLs referenced in raw HTML
///
/// Every match of every pattern is resolved against `page_url`; matches that
/// fail to resolve or point at another host are discarded. The result is
/// deduplicated and sorted.
///
/// # Example
///
/// ```
/// use sumi_corpus::crawler::discover_endpoints;
/// use url::Url;
///
/// let html = r#"<script>fetch("/api/courses?page=1")</script>"#;
/// let page = Url::parse("https://example.com/catalog").unwrap();
/// let endpoints = discover_endpoints(html, &page);
/// assert_eq!(endpoints[0].as_str(), "https://example.com/api/courses?page=1");
/// ```
pub fn discover_endpoints(html: &str, page_url: &Url) -> Vec<Url> {
    let mut found = BTreeSet::new();

    for pattern in ENDPOINT_PATTERNS.iter() {
        for captures in pattern.captures_iter(html) {
            let Some(path) = captures.get(1) else {
                continue;
            };

            if let Some(url) = resolve_href(path.as_str(), page_url) {
                if url.host_str() == page_url.host_str() {
                    found.insert(url);
                }
            }
        }
    }

    found.into_iter().collect()
}

/// Fetches discovered endpoints and returns the long strings found in their JSON
///
/// At most `max_endpoints_per_page` endpoints are fetched, with up to
/// `endpoint_concurrency` requests in flight. Failed requests, non-2xx
/// responses and bodies that are not JSON contribute nothing.
pub async fn fetch_endpoint_texts(
    client: &Client,
    mut endpoints: Vec<Url>,
    http: &HttpConfig,
    extract: &ExtractConfig,
) -> Vec<String> {
    if endpoints.len() > extract.max_endpoints_per_page {
        tracing::debug!(
            "Dropping {} of {} discovered endpoints (cap {})",
            endpoints.len() - extract.max_endpoints_per_page,
            endpoints.len(),
            extract.max_endpoints_per_page
        );
        endpoints.truncate(extract.max_endpoints_per_page);
    }

    let timeout = Duration::from_secs(http.endpoint_timeout_secs);

    let documents: Vec<Option<Value>> = stream::iter(endpoints)
        .map(|endpoint| async move { fetch_json(client, &endpoint, timeout).await })
        .buffered(extract.endpoint_concurrency.max(1))
        .collect()
        .await;

    let mut texts = Vec::new();
    for document in documents.iter().flatten() {
        collect_json_text(document, extract.min_json_words, &mut texts);
    }
    texts
}

/// Fetches one endpoint and decodes it as JSON
///
/// A declared `application/json` content type and a plain parse attempt are
/// treated the same way; the declaration only changes how a failure is logged.
async fn fetch_json(client: &Client, endpoint: &Url, timeout: Duration) -> Option<Value> {
    match fetch_url(client, endpoint.as_str(), timeout).await {
        FetchResult::Success {
            content_type, body, ..
        } => match serde_json::from_str::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                if content_type.contains("application/json") {
                    tracing::debug!("Endpoint {} declared JSON but failed to parse: {}", endpoint, e);
                } else {
                    tracing::trace!("Endpoint {} did not return JSON", endpoint);
                }
                None
            }
        },
        FetchResult::HttpError { status_code } => {
            tracing::debug!("Endpoint {} returned HTTP {}", endpoint, status_code);
            None
        }
        FetchResult::NetworkError { error } => {
            tracing::debug!("Endpoint {} failed: {}", endpoint, error);
            None
        }
    }
}

/// Walks a JSON value depth-first, collecting strings with more than `min_words` words
pub fn collect_json_text(value: &Value, min_words: usize, out: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            if text.split_whitespace().count() > min_words {
                out.push(text.trim().to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_json_text(item, min_words, out);
            }
        }
        Value::Object(fields) => {
            for field in fields.values() {
                collect_json_text(field, min_words, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
