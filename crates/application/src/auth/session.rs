//! Auth session adapter.
//!
//! Translates the authentication operations into calls on an injected
//! [`HttpTransport`] and keeps one piece of derived state, the current user,
//! broadcast to every observer.
//!
//! # State rules
//!
//! - Construction spawns a one-shot probe of `/auth/me`; whatever it finds,
//!   observers receive a definite first state (`None` on any failure). That
//!   state is also replayed to observers who subscribe after the probe
//!   finished, until another operation publishes.
//! - Every operation publishes at most once. Failed operations publish
//!   nothing, except the unauthorized case of `get_current_user`.
//! - `sign_out` always publishes `None`, whatever the remote outcome.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use passage_domain::{AuthSuccessResponse, SignInCodeRequest, User, VerifyCodeRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::endpoint::AuthEndpoint;
use super::state::{AuthState, AuthStateChannel, AuthStateStream, DEFAULT_STATE_CAPACITY};
use crate::ports::{AuthOperation, FailureReporter, HttpTransport, TransportError};

/// Client-side view of the user's authentication session.
///
/// Cloning is cheap; clones share the transport and the state channel.
pub struct AuthSession<T: ?Sized> {
    inner: Arc<SessionInner<T>>,
}

struct SessionInner<T: ?Sized> {
    state: AuthStateChannel,
    initialized: AtomicBool,
    reporter: Option<Arc<dyn FailureReporter>>,
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for AuthSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> fmt::Debug for AuthSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("initialized", &self.inner.initialized.load(Ordering::Acquire))
            .field("disposed", &self.inner.state.is_closed())
            .field("subscribers", &self.inner.state.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Builder for [`AuthSession`].
pub struct AuthSessionBuilder<T: ?Sized> {
    capacity: usize,
    reporter: Option<Arc<dyn FailureReporter>>,
    transport: Arc<T>,
}

impl<T: HttpTransport + ?Sized + 'static> AuthSessionBuilder<T> {
    /// Sets how many state emissions are buffered per subscriber.
    #[must_use]
    pub const fn state_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the collaborator that receives swallowed failures.
    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Builds the session and schedules its startup probe.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, as `tokio::spawn` does.
    #[must_use]
    pub fn build(self) -> AuthSession<T> {
        let session = AuthSession {
            inner: Arc::new(SessionInner {
                state: AuthStateChannel::with_capacity(self.capacity),
                initialized: AtomicBool::new(false),
                reporter: self.reporter,
                transport: self.transport,
            }),
        };
        session.start();
        session
    }
}

impl<T: HttpTransport + ?Sized + 'static> AuthSession<T> {
    /// Creates a session with default settings and schedules its startup probe.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        Self::builder(transport).build()
    }

    /// Starts building a session.
    #[must_use]
    pub fn builder(transport: Arc<T>) -> AuthSessionBuilder<T> {
        AuthSessionBuilder {
            capacity: DEFAULT_STATE_CAPACITY,
            reporter: None,
            transport,
        }
    }

    /// Subscribe to auth state changes from now on.
    ///
    /// Until another operation publishes, the startup state is delivered
    /// first, even when the probe finished before this call.
    #[must_use]
    pub fn subscribe(&self) -> AuthStateStream {
        self.inner.state.subscribe()
    }

    /// Fetches the current user and publishes the result.
    ///
    /// An unauthorized response is not an error: it publishes and returns `None`.
    ///
    /// # Errors
    ///
    /// Any other transport failure is returned unchanged and nothing is published.
    pub async fn get_current_user(&self) -> Result<Option<User>, TransportError> {
        let user = self.fetch_current_user().await?;
        self.publish(user.clone());
        Ok(user)
    }

    /// Asks the service to email a one-time sign-in code.
    ///
    /// # Errors
    ///
    /// Transport failures are returned unchanged.
    pub async fn request_sign_in_code(
        &self,
        email: &str,
        is_dashboard_login: bool,
    ) -> Result<(), TransportError> {
        let path = AuthEndpoint::RequestCode.path();
        tracing::debug!(path, is_dashboard_login, "requesting sign-in code");

        let body = encode(&SignInCodeRequest::new(email, is_dashboard_login))?;
        self.inner.transport.post(path, Some(body)).await?;
        Ok(())
    }

    /// Verifies a one-time sign-in code and publishes the signed-in user.
    ///
    /// # Errors
    ///
    /// Transport failures are returned unchanged and nothing is published.
    pub async fn verify_sign_in_code(
        &self,
        email: &str,
        code: &str,
        is_dashboard_login: bool,
    ) -> Result<AuthSuccessResponse, TransportError> {
        let path = AuthEndpoint::VerifyCode.path();
        tracing::debug!(path, is_dashboard_login, "verifying sign-in code");

        let body = encode(&VerifyCodeRequest::new(email, code, is_dashboard_login))?;
        let response = self.inner.transport.post(path, Some(body)).await?;
        self.signed_in(response)
    }

    /// Creates a guest identity and publishes it.
    ///
    /// # Errors
    ///
    /// Transport failures are returned unchanged and nothing is published.
    pub async fn sign_in_anonymously(&self) -> Result<AuthSuccessResponse, TransportError> {
        let path = AuthEndpoint::Anonymous.path();
        tracing::debug!(path, "signing in anonymously");

        let response = self.inner.transport.post(path, Some(json!({}))).await?;
        self.signed_in(response)
    }

    /// Signs out remotely and clears the local state.
    ///
    /// Never fails: a remote failure is reported and the state is cleared anyway.
    pub async fn sign_out(&self) {
        let path = AuthEndpoint::SignOut.path();
        tracing::debug!(path, "signing out");

        if let Err(error) = self.inner.transport.post(path, None).await {
            self.swallow(AuthOperation::SignOut, &error);
        }
        self.publish(None);
        tracing::info!("signed out");
    }

    /// Closes the state channel. Safe to call more than once.
    pub fn dispose(&self) {
        if self.inner.state.close() {
            tracing::debug!("auth session disposed");
        }
    }

    /// Returns true once `dispose` has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.state.is_closed()
    }

    fn start(&self) {
        if self
            .inner
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let session = self.clone();
        tokio::spawn(async move { session.initialize().await });
    }

    async fn initialize(&self) {
        let state = match self.fetch_current_user().await {
            Ok(user) => user,
            Err(error) => {
                self.swallow(AuthOperation::Initialize, &error);
                None
            }
        };
        let delivered = self.inner.state.publish_initial(state);
        tracing::trace!(delivered, "startup auth state published");
    }

    async fn fetch_current_user(&self) -> Result<AuthState, TransportError> {
        let path = AuthEndpoint::Me.path();
        tracing::debug!(path, "fetching current user");

        match self.inner.transport.get(path).await {
            Ok(body) => decode(body).map(Some),
            Err(error) if error.is_unauthorized() => {
                tracing::debug!("no active session");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn signed_in(&self, response: Option<Value>) -> Result<AuthSuccessResponse, TransportError> {
        let response: AuthSuccessResponse = decode(response.unwrap_or(Value::Null))?;
        tracing::info!(
            user_id = %response.user.id,
            anonymous = response.user.is_anonymous(),
            "signed in"
        );
        self.publish(Some(response.user.clone()));
        Ok(response)
    }

    fn publish(&self, state: AuthState) {
        let signed_in = state.is_some();
        let delivered = self.inner.state.publish(state);
        tracing::trace!(signed_in, delivered, "auth state published");
    }

    fn swallow(&self, operation: AuthOperation, error: &TransportError) {
        tracing::debug!(
            %operation,
            kind = error.kind().as_str(),
            %error,
            "auth failure handled locally"
        );
        if let Some(reporter) = &self.inner.reporter {
            reporter.report(operation, error);
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Value, TransportError> {
    serde_json::to_value(body)
        .map_err(|e| TransportError::Unclassified(format!("failed to encode request: {e}")))
}

fn decode<R: DeserializeOwned>(body: Value) -> Result<R, TransportError> {
    serde_json::from_value(body).map_err(|e| TransportError::decode(&e))
}
