//! Authentication domain types

mod types;

pub use types::{AuthSuccessResponse, AuthToken, SignInCodeRequest, VerifyCodeRequest};
