//! Frontier queue of URLs awaiting a fetch attempt
//!
//! The frontier is a FIFO of (url, depth) pairs drained in fixed-size
//! batches. Batching preserves approximate breadth-first order; a batch may
//! straddle two depth levels.

use std::collections::VecDeque;

/// A URL waiting in the frontier together with its link distance from the start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Absolute URL to fetch
    pub url: String,

    /// Number of hops from the start URL
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Scheduler manages the frontier queue
pub struct Scheduler {
    /// Pending entries, front is dispatched first
    frontier: VecDeque<FrontierEntry>,

    /// Maximum number of entries per batch
    batch_size: usize,
}

impl Scheduler {
    /// Creates a scheduler seeded with the start entry
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn new(seed: FrontierEntry, batch_size: usize) -> Self {
        Self {
            frontier: VecDeque::from([seed]),
            batch_size: batch_size.max(1),
        }
    }

    /// Removes up to `batch_size` entries from the front of the frontier
    pub fn next_batch(&mut self) -> Vec<FrontierEntry> {
        let take = self.batch_size.min(self.frontier.len());
        self.frontier.drain(..take).collect()
    }

    /// Appends entries to the back of the frontier
    pub fn extend(&mut self, entries: impl IntoIterator<Item = FrontierEntry>) {
        self.frontier.extend(entries);
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}
