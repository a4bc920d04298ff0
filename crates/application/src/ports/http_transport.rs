//! HTTP transport port
//!
//! Defines the interface the auth session uses to talk to the remote
//! service, along with the error taxonomy every transport must map into.

use async_trait::async_trait;
use serde_json::Value;

/// Errors a transport can surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No active session, or the session expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The service rejected the request payload.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Credentials were presented but rejected (e.g. a wrong sign-in code).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The service failed while handling the request.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message from the service.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Any failure outside the known taxonomy.
    #[error("unclassified error: {0}")]
    Unclassified(String),
}

/// Copyable label for a `TransportError`, used in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// See [`TransportError::Unauthorized`].
    Unauthorized,
    /// See [`TransportError::InvalidInput`].
    InvalidInput,
    /// See [`TransportError::AuthenticationFailed`].
    AuthenticationFailed,
    /// See [`TransportError::Server`].
    Server,
    /// See [`TransportError::Network`].
    Network,
    /// See [`TransportError::Unclassified`].
    Unclassified,
}

impl TransportErrorKind {
    /// Returns a stable, lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidInput => "invalid_input",
            Self::AuthenticationFailed => "authentication_failed",
            Self::Server => "server",
            Self::Network => "network",
            Self::Unclassified => "unclassified",
        }
    }
}

impl TransportError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> TransportErrorKind {
        match self {
            Self::Unauthorized(_) => TransportErrorKind::Unauthorized,
            Self::InvalidInput(_) => TransportErrorKind::InvalidInput,
            Self::AuthenticationFailed(_) => TransportErrorKind::AuthenticationFailed,
            Self::Server { .. } => TransportErrorKind::Server,
            Self::Network(_) => TransportErrorKind::Network,
            Self::Unclassified(_) => TransportErrorKind::Unclassified,
        }
    }

    /// Returns true for the "no active session" case.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Builds the error for a payload that does not match the expected record.
    #[must_use]
    pub fn decode(error: &serde_json::Error) -> Self {
        Self::Unclassified(format!("unexpected response payload: {error}"))
    }
}

/// Port for issuing JSON requests against the authentication service.
///
/// Paths are relative to the transport's base URL. Connection handling,
/// credentials, retries and timeouts all belong to the implementation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a GET and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` classified per the taxonomy above.
    async fn get(&self, path: &str) -> Result<Value, TransportError>;

    /// Issues a POST with an optional JSON body.
    ///
    /// Returns `None` when the response carried no body.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` classified per the taxonomy above.
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Option<Value>, TransportError>;
}
