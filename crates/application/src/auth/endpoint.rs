//! Endpoints contacted by the auth session.

/// HTTP method used for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMethod {
    /// GET
    Get,
    /// POST
    Post,
}

/// The fixed set of authentication endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthEndpoint {
    /// Current user lookup.
    Me,
    /// One-time code request.
    RequestCode,
    /// One-time code verification.
    VerifyCode,
    /// Anonymous sign-in.
    Anonymous,
    /// Sign-out.
    SignOut,
}

impl AuthEndpoint {
    /// All endpoints, in table order.
    pub const ALL: [Self; 5] = [
        Self::Me,
        Self::RequestCode,
        Self::VerifyCode,
        Self::Anonymous,
        Self::SignOut,
    ];

    /// Path relative to the transport's base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Me => "/auth/me",
            Self::RequestCode => "/auth/request-code",
            Self::VerifyCode => "/auth/verify-code",
            Self::Anonymous => "/auth/anonymous",
            Self::SignOut => "/auth/sign-out",
        }
    }

    /// HTTP method for this endpoint.
    #[must_use]
    pub const fn method(self) -> EndpointMethod {
        match self {
            Self::Me => EndpointMethod::Get,
            Self::RequestCode | Self::VerifyCode | Self::Anonymous | Self::SignOut => {
                EndpointMethod::Post
            }
        }
    }
}
