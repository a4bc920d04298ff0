//! Authentication session module.
//!
//! This module provides:
//! - The auth session adapter that keeps the current user in sync with the service
//! - A broadcast channel republishing the current user to observers
//! - The table of endpoints the session talks to

mod endpoint;
mod session;
mod state;

pub use endpoint::{AuthEndpoint, EndpointMethod};
pub use session::{AuthSession, AuthSessionBuilder};
pub use state::{AuthState, AuthStateChannel, AuthStateStream, DEFAULT_STATE_CAPACITY};
