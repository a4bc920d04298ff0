//! Transport configuration.

use std::time::Duration;

use passage_application::ports::TransportError;
use url::Url;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`crate::ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Base URL; endpoint paths resolve under it. Always ends with `/`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl TransportConfig {
    /// Creates a configuration for the given base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidInput` if the URL does not parse or is
    /// not http(s).
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidInput(format!("{e}: {base_url}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidInput(format!(
                "unsupported scheme {}: {base_url}",
                url.scheme()
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("Passage/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
