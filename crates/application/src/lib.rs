//! Passage Application - auth session core
//!
//! This crate holds the ports the session depends on and the session
//! adapter itself. Concrete transports live in the infrastructure crate.

pub mod auth;
pub mod ports;

pub use auth::{AuthEndpoint, AuthSession, AuthSessionBuilder, AuthState, AuthStateStream};
pub use ports::{AuthOperation, FailureReporter, HttpTransport, TransportError, TransportErrorKind};
