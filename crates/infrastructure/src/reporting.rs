//! Failure reporter that writes to `tracing`.

use passage_application::ports::{AuthOperation, FailureReporter, TransportError};

/// Emits a `warn` event for every failure the auth session swallows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    /// Creates a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FailureReporter for TracingReporter {
    fn report(&self, operation: AuthOperation, error: &TransportError) {
        tracing::warn!(
            target: "passage::auth",
            %operation,
            kind = error.kind().as_str(),
            %error,
            "auth operation failed; local state was cleared"
        );
    }
}
