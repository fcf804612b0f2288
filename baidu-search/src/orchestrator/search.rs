//! Core search loop: paced sequential page fetches, extraction, dedup,
//! early termination.
//!
//! Pages are fetched strictly one after another; the pacing policy exists
//! to serialise requests, so there is no fan-out here.

use tokio_util::sync::CancellationToken;

use crate::config::{RetryPolicy, ScraperConfig};
use crate::engine::PageSource;
use crate::error::SearchError;
use crate::extract::Extractor;
use crate::types::{ResultRecord, SearchQuery};

use super::dedup::{should_stop, Aggregator, PageTally};
use super::pacing::{pace, sleep_or_cancel};

/// Outcome of one search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Deduplicated records in first-seen order.
    pub records: Vec<ResultRecord>,
    /// Number of pages actually fetched.
    pub pages_fetched: usize,
    /// Whether a short page ended the loop before `page_count` pages.
    pub stopped_early: bool,
}

/// Walk the result pages for `query`.
///
/// # Pipeline
///
/// For each page index from 0 to `query.page_count() - 1`:
///
/// 1. Check for cancellation
/// 2. Sleep a random pacing delay (not before the first page)
/// 3. Fetch the page, retrying per `config.retry`
/// 4. Extract partial records
/// 5. Merge into the aggregate, dropping URLs already seen
/// 6. Stop if the page looks like the last one (see [`should_stop`])
///
/// # Errors
///
/// Any fetch failure aborts the whole search; records gathered from
/// earlier pages are discarded. Returns [`SearchError::Cancelled`] if
/// `cancel` fires between pages or during a delay.
pub async fn run_search<S: PageSource>(
    source: &S,
    extractor: &Extractor,
    query: &SearchQuery,
    config: &ScraperConfig,
    cancel: &CancellationToken,
) -> Result<SearchReport, SearchError> {
    let page_count = query.page_count();
    let mut aggregate = Aggregator::new();
    let mut pages_fetched = 0;
    let mut stopped_early = false;

    tracing::debug!(keywords = query.keywords(), page_count, "search started");

    for page_index in 0..page_count {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        pace(page_index, config.request_delay_ms, cancel).await?;

        tracing::info!(page = page_index + 1, "fetching result page");
        let html = fetch_with_retry(source, query.keywords(), page_index, &config.retry, cancel)
            .await
            .inspect_err(|err| {
                tracing::error!(page = page_index + 1, error = %err, "result page fetch failed");
            })?;
        pages_fetched += 1;

        let page = extractor.extract_page(&html);
        if page.containers == 0 {
            tracing::warn!(page = page_index + 1, "no result containers found on page");
        }
        let tally = PageTally {
            page_index,
            containers: page.containers,
            net_new: aggregate.accept_page(page.records),
        };
        tracing::info!(
            page = page_index + 1,
            net_new = tally.net_new,
            containers = tally.containers,
            "result page scraped"
        );

        if should_stop(config.termination, config.page_size, tally, page_count) {
            tracing::info!(
                page = page_index + 1,
                threshold = config.page_size,
                "short page, assuming no further results"
            );
            stopped_early = true;
            break;
        }
    }

    tracing::info!(total = aggregate.len(), pages_fetched, "search finished");
    Ok(SearchReport {
        records: aggregate.into_records(),
        pages_fetched,
        stopped_early,
    })
}

/// Fetch one page, retrying retryable failures with backoff.
async fn fetch_with_retry<S: PageSource>(
    source: &S,
    keywords: &str,
    page_index: usize,
    retry: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<String, SearchError> {
    let mut attempt = 0;
    loop {
        match source.fetch_page(keywords, page_index).await {
            Ok(html) => return Ok(html),
            Err(err) if err.is_retryable() && attempt < retry.max_attempts => {
                attempt += 1;
                let delay = retry.delay_for_attempt(attempt);
                tracing::warn!(
                    page = page_index + 1,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying result page"
                );
                sleep_or_cancel(delay, cancel).await?;
            }
            Err(err) => return Err(err),
        }
    }
}
