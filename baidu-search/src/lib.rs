//! # baidu-search
//!
//! Paginated scraper for Baidu web search result pages.
//!
//! Given keywords and a page count, it produces an ordered, deduplicated
//! list of [`ResultRecord`]s (`title`, `url`, `source`, `content`).
//! Persistence and presentation are left to the caller.
//!
//! ## Design
//!
//! - One landing-page visit seeds a cookie jar before the first page fetch
//! - Pages are fetched sequentially with a random 1-3 s delay between them
//! - Each field is located through an ordered list of selector strategies,
//!   covering several historical result layouts
//! - Results are deduplicated by URL across pages, in first-seen order
//! - A page yielding fewer than ten new results ends pagination early
//!
//! ## Logging
//!
//! The crate only emits [`tracing`] events, inside a span the caller can
//! supply via [`BaiduScraper::with_span`]. Query text appears at trace and
//! debug level only.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod http;
pub mod orchestrator;
pub mod scraper;
pub mod session;
pub mod types;

pub use config::{RetryPolicy, ScraperConfig, TerminationPolicy};
pub use engine::PageSource;
pub use error::{Result, SearchError};
pub use orchestrator::search::SearchReport;
pub use scraper::BaiduScraper;
pub use session::SessionState;
pub use types::{ResultRecord, SearchQuery, UNKNOWN_SOURCE};

/// Run one search with a fresh scraper, closing it on every exit path.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid `config`, otherwise the
/// same errors as [`BaiduScraper::search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> baidu_search::Result<()> {
/// let config = baidu_search::ScraperConfig::default();
/// let results = baidu_search::search("人工智能", 2, config).await?;
/// for result in &results {
///     println!("{} ({}): {}", result.title, result.source, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    keywords: &str,
    page_count: i64,
    config: ScraperConfig,
) -> Result<Vec<ResultRecord>> {
    let mut scraper = BaiduScraper::new(config)?;
    let outcome = scraper.search(keywords, page_count).await;
    scraper.close();
    outcome
}
