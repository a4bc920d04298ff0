//! Failure reporter port

use std::fmt;

use super::TransportError;

/// The auth session operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthOperation {
    /// The startup probe run once per session.
    Initialize,
    /// Fetching the current user.
    GetCurrentUser,
    /// Requesting a one-time sign-in code.
    RequestSignInCode,
    /// Verifying a one-time sign-in code.
    VerifySignInCode,
    /// Anonymous sign-in.
    SignInAnonymously,
    /// Signing out.
    SignOut,
}

impl AuthOperation {
    /// Returns a stable, snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::GetCurrentUser => "get_current_user",
            Self::RequestSignInCode => "request_sign_in_code",
            Self::VerifySignInCode => "verify_sign_in_code",
            Self::SignInAnonymously => "sign_in_anonymously",
            Self::SignOut => "sign_out",
        }
    }
}

impl fmt::Display for AuthOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for observing failures the auth session swallows.
///
/// Only failures that never reach a caller are reported here; propagated
/// errors are the caller's to handle.
pub trait FailureReporter: Send + Sync {
    /// Records a swallowed failure.
    fn report(&self, operation: AuthOperation, error: &TransportError);
}
