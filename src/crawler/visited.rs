//! The set of URLs admitted for fetching during one crawl

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// URL was inserted; the caller owns the fetch
    Admitted,
    /// URL was admitted earlier in this crawl
    AlreadyVisited,
    /// The page budget is spent
    BudgetExhausted,
}

/// Shared visited set with atomic check-and-insert
///
/// Cloning is cheap and every clone observes the same set.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `url` unless it was already admitted or `max_pages` URLs are in the set
    ///
    /// The budget check and the insert happen under one lock, so concurrent
    /// callers can never admit the same URL twice or overshoot the budget.
    pub fn try_admit(&self, url: &str, max_pages: usize) -> Admission {
        let mut visited = self.lock();

        if visited.contains(url) {
            return Admission::AlreadyVisited;
        }

        if visited.len() >= max_pages {
            return Admission::BudgetExhausted;
        }

        visited.insert(url.to_string());
        Admission::Admitted
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set is only ever mutated by a single insert, so a poisoned lock
        // still holds a consistent set.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
