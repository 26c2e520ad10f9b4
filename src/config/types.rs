use serde::Deserialize;

/// Main configuration structure for Sumi-Corpus
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Config {
    /// Creates a configuration for `start_url` with every other setting defaulted
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            crawl: CrawlConfig::new(start_url),
            http: HttpConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

/// Traversal budget for one crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Absolute URL the crawl starts from; also defines which host is internal
    ///
    /// May be left out of a file when the command line supplies it; validation
    /// rejects it if it is still empty.
    #[serde(rename = "start-url", default)]
    pub start_url: String,

    /// Maximum number of URLs admitted for fetching
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link distance from the start URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of page fetches in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl CrawlConfig {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            concurrency: default_concurrency(),
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for a page GET (seconds)
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for a dynamic endpoint GET (seconds)
    #[serde(rename = "endpoint-timeout-secs", default = "default_endpoint_timeout")]
    pub endpoint_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_timeout_secs: default_page_timeout(),
            endpoint_timeout_secs: default_endpoint_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Text extraction and endpoint discovery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Number of words per chunk
    #[serde(rename = "chunk-size", default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Paragraphs with this many words or fewer are dropped
    #[serde(rename = "min-paragraph-words", default = "default_min_paragraph_words")]
    pub min_paragraph_words: usize,

    /// JSON strings with this many words or fewer are dropped
    #[serde(rename = "min-json-words", default = "default_min_json_words")]
    pub min_json_words: usize,

    /// Upper bound on dynamic endpoints fetched for a single page (0 disables)
    #[serde(rename = "max-endpoints-per-page", default = "default_max_endpoints")]
    pub max_endpoints_per_page: usize,

    /// Maximum number of endpoint fetches in flight for a single page
    #[serde(rename = "endpoint-concurrency", default = "default_endpoint_concurrency")]
    pub endpoint_concurrency: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            min_paragraph_words: default_min_paragraph_words(),
            min_json_words: default_min_json_words(),
            max_endpoints_per_page: default_max_endpoints(),
            endpoint_concurrency: default_endpoint_concurrency(),
        }
    }
}

fn default_max_pages() -> usize {
    10
}

fn default_max_depth() -> u32 {
    2
}

fn default_concurrency() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("SumiCorpus/{}", env!("CARGO_PKG_VERSION"))
}

fn default_page_timeout() -> u64 {
    15
}

fn default_endpoint_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_chunk_size() -> usize {
    800
}

fn default_min_paragraph_words() -> usize {
    5
}

fn default_min_json_words() -> usize {
    3
}

fn default_max_endpoints() -> usize {
    50
}

fn default_endpoint_concurrency() -> usize {
    4
}
