//! Shared HTTP client and request URL construction.
//!
//! Provides a [`reqwest::Client`] with a cookie jar (carrying the session
//! obtained from the landing page) and the fixed browser-like header
//! bundle applied to every request.

use reqwest::header::{self, HeaderMap, HeaderValue};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::SearchError;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Build the header bundle sent with every request.
///
/// `Accept-Encoding` is left to reqwest so that only encodings it can
/// actually decode (gzip, brotli) are advertised.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if a configured header value contains
/// characters not allowed in HTTP headers.
pub fn default_headers(config: &ScraperConfig) -> Result<HeaderMap, SearchError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)
            .map_err(|e| SearchError::Config(format!("invalid accept_language: {e}")))?,
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    Ok(headers)
}

/// Build a [`reqwest::Client`] configured for result-page scraping.
///
/// The client has:
/// - Cookie store enabled (session cookies from the landing page)
/// - Fixed desktop User-Agent (or the configured override)
/// - The browser header bundle from [`default_headers`]
/// - Brotli and gzip decompression
///
/// Timeouts are applied per request, since bootstrap and page fetches
/// use different limits.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &ScraperConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .user_agent(config.effective_user_agent())
        .default_headers(default_headers(config)?)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Build the result page URL for a zero-based page index.
///
/// Keywords are percent-encoded as UTF-8; the `pn` offset is
/// `page_index * page_size`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the base URL or path is unusable.
pub fn page_url(
    config: &ScraperConfig,
    keywords: &str,
    page_index: usize,
) -> Result<Url, SearchError> {
    let mut url = Url::parse(&config.base_url)
        .and_then(|base| base.join(&config.search_path))
        .map_err(|e| SearchError::Config(format!("invalid search endpoint: {e}")))?;
    let offset = page_index * config.page_size;
    url.set_query(Some(&format!(
        "wd={}&pn={offset}",
        urlencoding::encode(keywords)
    )));
    Ok(url)
}
