//! Authentication payload types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Opaque credential issued by the authentication service.
///
/// The `Debug` output only shows a short preview so tokens do not leak into
/// logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Get a preview of the token (first 8 chars + ...).
    #[must_use]
    pub fn preview(&self) -> String {
        if self.0.len() > 12 {
            let cut = self
                .0
                .char_indices()
                .nth(8)
                .map_or(self.0.len(), |(idx, _)| idx);
            format!("{}...", &self.0[..cut])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&self.preview()).finish()
    }
}

/// Successful sign-in: the established identity plus its credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSuccessResponse {
    /// The signed-in user.
    pub user: User,
    /// Credential for subsequent requests.
    pub token: AuthToken,
}

impl AuthSuccessResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub const fn new(user: User, token: AuthToken) -> Self {
        Self { user, token }
    }

    /// Splits the response into user and token.
    #[must_use]
    pub fn into_parts(self) -> (User, AuthToken) {
        (self.user, self.token)
    }
}

/// Body of a "send me a sign-in code" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInCodeRequest {
    /// Address the code is sent to.
    pub email: String,
    /// Whether the code is for the dashboard login flow.
    pub is_dashboard_login: bool,
}

impl SignInCodeRequest {
    /// Creates a new request body.
    #[must_use]
    pub fn new(email: impl Into<String>, is_dashboard_login: bool) -> Self {
        Self {
            email: email.into(),
            is_dashboard_login,
        }
    }
}

/// Body of a "verify this sign-in code" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    /// Address the code was sent to.
    pub email: String,
    /// The one-time code.
    pub code: String,
    /// Whether the code is for the dashboard login flow.
    pub is_dashboard_login: bool,
}

impl VerifyCodeRequest {
    /// Creates a new request body.
    #[must_use]
    pub fn new(email: impl Into<String>, code: impl Into<String>, is_dashboard_login: bool) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
            is_dashboard_login,
        }
    }
}
