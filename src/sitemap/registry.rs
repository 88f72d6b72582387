//! Observed URL registry.
//!
//! # Responsibilities
//! - Remember every canonical URL that was served successfully
//! - Hand out point-in-time copies for sitemap synthesis; filtering by
//!   origin happens in the builder, outside the lock
//!
//! # Design Decisions
//! - One mutex guards the set; it is held only for the insert or the copy,
//!   never while XML is serialized
//! - Grows for the lifetime of the process, no eviction
//! - Owned by one middleware instance and shared through `Arc`

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::observability::metrics;

#[derive(Debug, Default)]
pub struct PathRegistry {
    paths: Mutex<HashSet<String>>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the set half-updated, so a
    // poisoned guard is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `url`. Returns true if it was not known yet.
    pub fn record(&self, url: impl Into<String>) -> bool {
        let (inserted, len) = {
            let mut paths = self.lock();
            let inserted = paths.insert(url.into());
            (inserted, paths.len())
        };

        if inserted {
            metrics::record_observed_path(len);
        }
        inserted
    }

    /// A copy of the current set, detached from later inserts.
    pub fn snapshot(&self) -> HashSet<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
