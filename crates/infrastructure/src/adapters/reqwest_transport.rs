//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port using the reqwest library.
//! It owns connection handling, the session cookie jar and timeouts, and maps
//! every failure into the port's error taxonomy.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use passage_application::ports::{HttpTransport, TransportError};

use crate::config::TransportConfig;

/// HTTP transport implementation using reqwest.
///
/// Keeps a cookie store so the session cookie issued on sign-in is sent
/// with every later request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a transport from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Unclassified(format!("failed to build client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Creates a transport around a custom reqwest client.
    ///
    /// `base_url` should end with `/` for endpoint paths to resolve under it.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Returns the base URL endpoint paths are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path under the base URL.
    fn endpoint_url(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidInput(format!("invalid endpoint path {path}: {e}")))
    }

    /// Sends a request and returns its JSON body, if any.
    async fn send(builder: RequestBuilder) -> Result<Option<Value>, TransportError> {
        let response = builder.send().await.map_err(Self::map_error)?;
        let status = response.status();

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Unclassified(format!("failed to read body: {e}")))?;

        if status.is_success() {
            parse_body(&text)
        } else {
            Err(classify_status(status, error_message(status, &text)))
        }
    }

    /// Maps reqwest errors to the transport taxonomy.
    fn map_error(error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Network(format!("request timed out: {error}"));
        }

        if error.is_connect() || error.is_request() {
            return TransportError::Network(error.to_string());
        }

        TransportError::Unclassified(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let url = self.endpoint_url(path)?;
        tracing::trace!(%url, "GET");

        let body = Self::send(self.client.get(url)).await?;
        Ok(body.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Option<Value>, TransportError> {
        let url = self.endpoint_url(path)?;
        tracing::trace!(%url, has_body = body.is_some(), "POST");

        let mut builder = self.client.post(url);
        if let Some(body) = &body {
            builder = builder.json(body);
        }
        Self::send(builder).await
    }
}

/// Parses a success body; blank bodies mean "no content".
fn parse_body(text: &str) -> Result<Option<Value>, TransportError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| TransportError::decode(&e))
}

/// Maps a non-success status to the transport taxonomy.
fn classify_status(status: StatusCode, message: String) -> TransportError {
    match status {
        StatusCode::UNAUTHORIZED => TransportError::Unauthorized(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            TransportError::InvalidInput(message)
        }
        StatusCode::FORBIDDEN => TransportError::AuthenticationFailed(message),
        s if s.is_server_error() => TransportError::Server {
            status: s.as_u16(),
            message,
        },
        s => TransportError::Unclassified(format!("unexpected status {}: {message}", s.as_u16())),
    }
}

/// Extracts a human-readable message from an error body.
///
/// Prefers an `error` or `message` string field, then the raw text, then the
/// status reason phrase.
fn error_message(status: StatusCode, text: &str) -> String {
    let from_json = serde_json::from_str::<Value>(text).ok().and_then(|value| {
        ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });

    from_json
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string())
}
