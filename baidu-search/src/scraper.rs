//! The scraper handle callers hold for the lifetime of a search session.
//!
//! A [`BaiduScraper`] owns one cookie-holding HTTP session and is meant for
//! one caller at a time: searches take `&mut self`. Concurrent searches
//! need one scraper each.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use url::Url;

use crate::config::ScraperConfig;
use crate::engine::PageSource;
use crate::error::SearchError;
use crate::extract::Extractor;
use crate::http;
use crate::orchestrator::search::{run_search, SearchReport};
use crate::session::{Session, SessionState};
use crate::types::{ResultRecord, SearchQuery};

/// Paginated result-page scraper with a lazily bootstrapped session.
#[derive(Debug)]
pub struct BaiduScraper {
    config: ScraperConfig,
    session: Session,
    extractor: Extractor,
    span: tracing::Span,
}

impl BaiduScraper {
    /// Create a scraper that logs under a default `baidu_scraper` span.
    ///
    /// No network activity happens until the first search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ScraperConfig) -> Result<Self, SearchError> {
        Self::with_span(config, tracing::info_span!("baidu_scraper"))
    }

    /// Create a scraper whose events are all recorded inside `span`.
    ///
    /// # Errors
    ///
    /// Same as [`BaiduScraper::new`].
    pub fn with_span(config: ScraperConfig, span: tracing::Span) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(&config)?;
        let session = Session::new(client, &config)?;
        let base = Url::parse(&config.base_url)
            .map_err(|e| SearchError::Config(format!("base_url is not a valid URL: {e}")))?;
        let extractor = Extractor::new(Some(base))?;
        Ok(Self {
            config,
            session,
            extractor,
            span,
        })
    }

    /// Current session bootstrap state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// The configuration this scraper was built with.
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Visit the landing page once to obtain session cookies.
    ///
    /// Idempotent once it has succeeded. Called automatically by every
    /// search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::SessionInit`] on a transport failure and
    /// [`SearchError::SessionFailed`] on any call after one.
    pub async fn ensure_initialized(&mut self) -> Result<SessionState, SearchError> {
        let span = self.span.clone();
        self.session.ensure_initialized().instrument(span).await
    }

    /// Search `keywords` over up to `page_count` result pages.
    ///
    /// `page_count < 1` is treated as 1.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidArgument`] for empty keywords, before any
    ///   network activity
    /// - [`SearchError::SessionInit`] if the session bootstrap fails
    /// - [`SearchError::Http`] / [`SearchError::Status`] if any page fetch
    ///   fails; no partial results are returned
    pub async fn search(
        &mut self,
        keywords: &str,
        page_count: i64,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        self.search_with_cancel(keywords, page_count, &CancellationToken::new())
            .await
    }

    /// Like [`BaiduScraper::search`], checking `cancel` between pages and
    /// during pacing delays.
    ///
    /// # Errors
    ///
    /// As [`BaiduScraper::search`], plus [`SearchError::Cancelled`].
    pub async fn search_with_cancel(
        &mut self,
        keywords: &str,
        page_count: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        let query = SearchQuery::new(keywords, page_count)?;
        Ok(self.search_detailed(&query, cancel).await?.records)
    }

    /// Run a search and report how pagination ended.
    ///
    /// # Errors
    ///
    /// As [`BaiduScraper::search_with_cancel`].
    pub async fn search_detailed(
        &mut self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<SearchReport, SearchError> {
        let span = self.span.clone();
        async {
            self.session.ensure_initialized().await?;
            run_search(&*self, &self.extractor, query, &self.config, cancel).await
        }
        .instrument(span)
        .await
    }

    /// Release the HTTP session and its cookie jar.
    ///
    /// Consumes the scraper, so it runs at most once and the handle cannot
    /// be used afterwards.
    pub fn close(self) {
        let _guard = self.span.enter();
        tracing::info!(state = ?self.session.state(), "scraper closed");
    }
}

impl PageSource for BaiduScraper {
    async fn fetch_page(&self, keywords: &str, page_index: usize) -> Result<String, SearchError> {
        let url = http::page_url(&self.config, keywords, page_index)?;
        let context = format!("page {} request", page_index + 1);
        tracing::trace!(%url, "GET result page");

        let response = self
            .session
            .client()
            .get(url)
            .timeout(Duration::from_secs(self.config.request_timeout_seconds))
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(&context, &e))?
            .error_for_status()
            .map_err(|e| SearchError::from_reqwest(&context, &e))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(&context, &e))?;

        tracing::trace!(bytes = html.len(), "result page received");
        Ok(html)
    }
}
