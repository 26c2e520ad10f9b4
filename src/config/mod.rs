//! Configuration module for Sumi-Corpus
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_corpus::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("corpus.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, ExtractConfig, HttpConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::validate;
