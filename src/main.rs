//! Sumi-Corpus main entry point
//!
//! This is the command-line interface for the Sumi-Corpus site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use sumi_corpus::config::{read_config, validate, Config};
use sumi_corpus::crawler::crawl;
use sumi_corpus::output::{log_statistics, CrawlOutput, CrawlStatistics};
use tracing_subscriber::EnvFilter;

/// Sumi-Corpus: turn a website into a retrieval corpus
///
/// Crawls a single site within page and depth budgets and writes the text
/// chunks, PDF links and image links of every page as one JSON document.
#[derive(Parser, Debug)]
#[command(name = "sumi-corpus")]
#[command(version)]
#[command(about = "Turn a website into a retrieval corpus", long_about = None)]
struct Cli {
    /// URL to start crawling from (overrides crawl.start-url)
    #[arg(value_name = "START_URL")]
    start_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<usize>,

    /// Maximum link depth from the start URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of concurrent page fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Write the JSON document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON document
    #[arg(long)]
    pretty: bool,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let start_url = config.crawl.start_url.clone();

    let pages = crawl(config)
        .await
        .with_context(|| format!("Crawl of {} failed", start_url))?;

    log_statistics(&CrawlStatistics::from_pages(&pages));

    let output = CrawlOutput::new(start_url, pages);
    match &cli.output {
        Some(path) => output
            .write_json(path, cli.pretty)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", output.to_json(cli.pretty)?),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays clean for the JSON document.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_corpus=info,warn"),
            1 => EnvFilter::new("sumi_corpus=debug,info"),
            2 => EnvFilter::new("sumi_corpus=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the config file (if any) with command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.start_url) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        (None, Some(start_url)) => Config::new(start_url.clone()),
        (None, None) => bail!("either START_URL or --config must be given"),
    };

    if let Some(start_url) = &cli.start_url {
        config.crawl.start_url = start_url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawl.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawl.max_depth = max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawl.concurrency = concurrency;
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}
