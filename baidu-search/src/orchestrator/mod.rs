//! Search orchestrator: paced pagination, dedup, early termination.
//!
//! Fetches result pages one at a time from a [`crate::engine::PageSource`],
//! extracts records, drops URLs already seen earlier in the same call, and
//! stops once a page looks like the last one.

pub mod dedup;
pub mod pacing;
pub mod search;
