//! Session bootstrap: one landing-page visit that seeds the cookie jar.
//!
//! # State Machine
//!
//! ```text
//! ┌───────────────┐  2xx           ┌─────────────┐
//! │ Uninitialized ├───────────────►│ Initialized │
//! └──┬────────┬───┘                └─────────────┘
//!    │        │ non-2xx                  ▲
//!    │        ▼                          │ 2xx on a later search
//!    │   ┌──────────┐────────────────────┘
//!    │   │ Degraded │
//!    │   └────┬─────┘
//!    │        │ transport error
//!    ▼        ▼
//! ┌────────────────┐
//! │     Failed     │  terminal: discard the scraper
//! └────────────────┘
//! ```

use std::time::Duration;

use url::Url;

use crate::config::ScraperConfig;
use crate::error::SearchError;

/// Lifecycle of a scraper's HTTP session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The landing page has not been visited yet.
    Uninitialized,
    /// The landing page answered with a non-2xx status. Fetches proceed
    /// without its cookies; the visit is retried on the next search.
    Degraded {
        /// Status code of the last landing-page response.
        status: u16,
    },
    /// Cookies were obtained; no further landing-page visits happen.
    Initialized,
    /// The landing-page visit failed at the transport level.
    Failed,
}

/// A cookie-holding HTTP client plus its bootstrap state.
#[derive(Debug)]
pub struct Session {
    client: reqwest::Client,
    landing: Url,
    timeout: Duration,
    state: SessionState,
}

impl Session {
    /// Wrap a client configured by [`crate::http::build_client`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configured base URL is invalid.
    pub fn new(client: reqwest::Client, config: &ScraperConfig) -> Result<Self, SearchError> {
        let landing = Url::parse(&config.base_url)
            .map_err(|e| SearchError::Config(format!("base_url is not a valid URL: {e}")))?;
        Ok(Self {
            client,
            landing,
            timeout: Duration::from_secs(config.bootstrap_timeout_seconds),
            state: SessionState::Uninitialized,
        })
    }

    /// Current bootstrap state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The underlying client, sharing the session's cookie jar.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Visit the landing page unless that already succeeded.
    ///
    /// A non-2xx answer is logged and tolerated. A transport failure is
    /// fatal and leaves the session permanently [`SessionState::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::SessionInit`] on a transport failure, or
    /// [`SearchError::SessionFailed`] if an earlier attempt already failed.
    pub async fn ensure_initialized(&mut self) -> Result<SessionState, SearchError> {
        match self.state {
            SessionState::Initialized => return Ok(self.state),
            SessionState::Failed => return Err(SearchError::SessionFailed),
            SessionState::Uninitialized | SessionState::Degraded { .. } => {}
        }

        let response = self
            .client
            .get(self.landing.clone())
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                self.state = SessionState::Initialized;
                tracing::info!("search session initialized");
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                self.state = SessionState::Degraded { status };
                tracing::warn!(status, "session bootstrap got non-success status, continuing without cookies");
            }
            Err(err) => {
                self.state = SessionState::Failed;
                let err = SearchError::SessionInit(if err.is_timeout() {
                    "landing page timed out".to_string()
                } else {
                    err.to_string()
                });
                tracing::error!(error = %err, "session bootstrap failed");
                return Err(err);
            }
        }
        Ok(self.state)
    }
}
