//! Cross-page deduplication and the "short page" stop heuristic.
//!
//! Records are keyed by their exact URL string. The first occurrence wins
//! and keeps its position, so the output preserves first-seen order
//! across pages.

use std::collections::HashSet;

use crate::config::TerminationPolicy;
use crate::types::{PartialRecord, ResultRecord};

/// Accumulates records across the pages of one search call.
#[derive(Debug, Default)]
pub struct Aggregator {
    seen: HashSet<String>,
    records: Vec<ResultRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one page's records, returning how many were net-new.
    ///
    /// Records without a URL are dropped; records whose URL was already
    /// accepted (on this or an earlier page) are dropped silently.
    pub fn accept_page(&mut self, partials: Vec<PartialRecord>) -> usize {
        let mut accepted = 0;
        for partial in partials {
            let Some(record) = partial.complete() else {
                continue;
            };
            if !self.seen.insert(record.url.clone()) {
                tracing::trace!(url = %record.url, "duplicate result dropped");
                continue;
            }
            self.records.push(record);
            accepted += 1;
        }
        accepted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }
}

/// Counts describing one fetched page, fed to [`should_stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTally {
    /// Zero-based page index.
    pub page_index: usize,
    /// Result containers found in the raw HTML.
    pub containers: usize,
    /// Records accepted after dedup.
    pub net_new: usize,
}

/// Whether the loop should stop after this page, although more pages were
/// requested.
///
/// Never stops after the last requested page (there is nothing to skip).
pub fn should_stop(
    policy: TerminationPolicy,
    page_size: usize,
    tally: PageTally,
    page_count: usize,
) -> bool {
    if tally.page_index + 1 >= page_count {
        return false;
    }
    let observed = match policy {
        TerminationPolicy::NetNew => tally.net_new,
        TerminationPolicy::RawContainers => tally.containers,
    };
    observed < page_size
}
