//! Statistics over a finished crawl

use crate::crawler::PageRecord;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of page records
    pub total_pages: usize,

    /// Number of text chunks across all pages
    pub total_chunks: usize,

    /// Number of words across all chunks
    pub total_words: usize,

    /// Number of PDF links across all pages
    pub total_pdfs: usize,

    /// Number of image links across all pages
    pub total_images: usize,

    /// Pages that produced no text at all
    pub empty_pages: usize,
}

impl CrawlStatistics {
    /// Computes statistics from page records
    pub fn from_pages(pages: &[PageRecord]) -> Self {
        pages.iter().fold(Self::default(), |mut stats, page| {
            stats.total_pages += 1;
            stats.total_chunks += page.chunks.len();
            stats.total_words += page
                .chunks
                .iter()
                .map(|chunk| chunk.split_whitespace().count())
                .sum::<usize>();
            stats.total_pdfs += page.pdfs.len();
            stats.total_images += page.images.len();
            if page.chunks.is_empty() {
                stats.empty_pages += 1;
            }
            stats
        })
    }
}

/// Logs statistics at info level
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Pages: {} ({} without text), chunks: {}, words: {}, pdfs: {}, images: {}",
        stats.total_pages,
        stats.empty_pages,
        stats.total_chunks,
        stats.total_words,
        stats.total_pdfs,
        stats.total_images
    );
}
