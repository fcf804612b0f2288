//! Scraper configuration with sensible defaults.
//!
//! [`ScraperConfig`] controls the endpoint, timeouts, pacing, retry and
//! termination behaviour. The defaults reproduce the polite, no-retry
//! behaviour expected by callers.

use std::time::Duration;

use url::Url;

use crate::error::SearchError;

/// Fixed desktop browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36 Edg/142.0.0.0";

/// Accept-Language sent with every request.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6";

/// How the scraper decides a page was the last one worth fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationPolicy {
    /// Stop when fewer than `page_size` records were newly accepted
    /// (after dedup) from a page. Duplicates count against the page.
    #[default]
    NetNew,
    /// Stop when fewer than `page_size` result containers were present
    /// on the raw page, regardless of how many were duplicates.
    RawContainers,
}

/// Bounded retry with exponential backoff for page fetches.
///
/// `max_attempts = 0` disables retries: the first failure is fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single backoff delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor applied per retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (1-based).
    ///
    /// `min(base * multiplier^(attempt-1), max)` plus up to 10% jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exp = self
            .backoff_multiplier
            .powi(i32::try_from(attempt - 1).unwrap_or(i32::MAX));
        let delay = (self.base_delay_ms as f64 * exp).min(self.max_delay_ms as f64);
        let jitter = delay * (rand::random::<f64>() * 0.1);
        Duration::from_millis((delay + jitter) as u64)
    }
}

/// Configuration for a [`crate::BaiduScraper`].
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Landing page visited once to obtain session cookies. Page URLs are
    /// built relative to it.
    pub base_url: String,
    /// Path of the result page endpoint.
    pub search_path: String,
    /// Timeout for the landing-page visit, in seconds.
    pub bootstrap_timeout_seconds: u64,
    /// Timeout for each result page request, in seconds.
    pub request_timeout_seconds: u64,
    /// Random delay range in milliseconds `(min, max)` slept before every
    /// page after the first.
    pub request_delay_ms: (u64, u64),
    /// Results per page in the engine's pagination scheme. Also the
    /// threshold below which a page is considered the last one.
    pub page_size: usize,
    /// Override for the fixed desktop User-Agent.
    pub user_agent: Option<String>,
    /// Accept-Language header value.
    pub accept_language: String,
    /// Retry behaviour for failed page fetches.
    pub retry: RetryPolicy,
    /// Early-stop heuristic.
    pub termination: TerminationPolicy,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.baidu.com".into(),
            search_path: "/s".into(),
            bootstrap_timeout_seconds: 10,
            request_timeout_seconds: 15,
            request_delay_ms: (1_000, 3_000),
            page_size: 10,
            user_agent: None,
            accept_language: DEFAULT_ACCEPT_LANGUAGE.into(),
            retry: RetryPolicy::default(),
            termination: TerminationPolicy::default(),
        }
    }
}

impl ScraperConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` must parse as an absolute http(s) URL
    /// - both timeouts must be greater than 0
    /// - `page_size` must be greater than 0
    /// - `request_delay_ms.0` must be <= `request_delay_ms.1`
    /// - `retry.backoff_multiplier` must be >= 1.0
    pub fn validate(&self) -> Result<(), SearchError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("base_url is not a valid URL: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SearchError::Config("base_url must be http or https".into()));
        }
        if self.bootstrap_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "bootstrap_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "request_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(SearchError::Config(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.request_delay_ms.0 > self.request_delay_ms.1 {
            return Err(SearchError::Config(
                "request_delay_ms min must be <= max".into(),
            ));
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(SearchError::Config(
                "retry backoff_multiplier must be >= 1.0".into(),
            ));
        }
        Ok(())
    }

    /// The User-Agent actually sent.
    pub fn effective_user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
