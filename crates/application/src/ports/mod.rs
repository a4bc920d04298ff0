//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the auth session and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod failure_reporter;
mod http_transport;

pub use failure_reporter::{AuthOperation, FailureReporter};
pub use http_transport::{HttpTransport, TransportError, TransportErrorKind};
