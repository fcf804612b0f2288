//! Trait at the seam between search orchestration and page fetching.
//!
//! [`crate::BaiduScraper`] implements [`PageSource`] over HTTP; tests drive
//! the orchestration loop with canned HTML instead.

use crate::error::SearchError;

/// A source of raw result-page HTML.
///
/// Implementors handle URL construction, headers and transport. Pacing
/// between pages is the caller's job and must not be repeated here.
pub trait PageSource: Send + Sync {
    /// Fetch the HTML of one result page.
    ///
    /// # Arguments
    ///
    /// * `keywords` — Raw keyword text; the implementation handles encoding.
    /// * `page_index` — Zero-based page number.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] or [`SearchError::Status`] when the page
    /// cannot be fetched. Either is fatal for the enclosing search.
    fn fetch_page(
        &self,
        keywords: &str,
        page_index: usize,
    ) -> impl std::future::Future<Output = Result<String, SearchError>> + Send;
}
