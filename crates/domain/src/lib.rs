//! Passage Domain - Core identity types
//!
//! This crate defines the records exchanged with the authentication service.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod user;

pub use auth::{AuthSuccessResponse, AuthToken, SignInCodeRequest, VerifyCodeRequest};
pub use error::{DomainError, DomainResult};
pub use user::{User, UserId, UserRole};
