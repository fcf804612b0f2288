//! Error types for the baidu-search crate.
//!
//! Messages are stable strings suitable for display to an operator.
//! Query text never appears in error messages.

/// Errors that can occur while scraping result pages.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The caller supplied an unusable query (e.g. empty keywords).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The landing-page visit failed at the transport level.
    #[error("session init failed: {0}")]
    SessionInit(String),

    /// A previous bootstrap failed fatally; the scraper must be recreated.
    #[error("session unusable after failed bootstrap")]
    SessionFailed,

    /// A request failed at the transport level (timeout, DNS, refused).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status}: {context}")]
    Status {
        /// What was being requested.
        context: String,
        /// Numeric status code.
        status: u16,
    },

    /// A single result container could not be turned into a record.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Invalid scraper configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The caller cancelled the search between pages.
    #[error("search cancelled")]
    Cancelled,
}

impl SearchError {
    /// Map a reqwest error onto [`SearchError::Status`] when the server
    /// answered, or [`SearchError::Http`] for transport failures.
    pub(crate) fn from_reqwest(context: &str, err: &reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                context: context.to_string(),
                status: status.as_u16(),
            },
            None if err.is_timeout() => Self::Http(format!("{context}: timed out")),
            None => Self::Http(format!("{context}: {err}")),
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Transport failures, rate limiting (429) and server errors (5xx) are
    /// retryable; client errors and everything outside page fetching are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::InvalidArgument(_)
            | Self::SessionInit(_)
            | Self::SessionFailed
            | Self::Extraction(_)
            | Self::Config(_)
            | Self::Cancelled => false,
        }
    }
}

/// Convenience type alias for baidu-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
