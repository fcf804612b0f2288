//! Randomised delay between consecutive page fetches.

use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;

/// Pick a delay uniformly from `range` (milliseconds, inclusive).
pub fn pacing_delay(range: (u64, u64)) -> Duration {
    let (min, max) = range;
    if min >= max {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

/// Sleep before fetching `page_index`. The first page is never delayed.
///
/// # Errors
///
/// Returns [`SearchError::Cancelled`] if `cancel` fires during the sleep.
pub async fn pace(
    page_index: usize,
    range: (u64, u64),
    cancel: &CancellationToken,
) -> Result<(), SearchError> {
    if page_index == 0 {
        return Ok(());
    }
    let delay = pacing_delay(range);
    tracing::debug!(delay_ms = delay.as_millis() as u64, "pacing before next page");
    sleep_or_cancel(delay, cancel).await
}

/// Sleep for `delay` unless `cancel` fires first.
pub(crate) async fn sleep_or_cancel(
    delay: Duration,
    cancel: &CancellationToken,
) -> Result<(), SearchError> {
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        () = cancel.cancelled() => Err(SearchError::Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}
