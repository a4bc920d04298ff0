//! User identity records.
//!
//! The remote service owns these records; the client only decodes them and
//! passes them around unmodified.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Unique identifier of a user as assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID, rejecting empty or whitespace-only values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if the value is blank.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "user id cannot be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role classification attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular signed-in account.
    #[default]
    Member,
    /// Account with dashboard/administrative access.
    Admin,
    /// Guest identity created by anonymous sign-in.
    Anonymous,
    /// A role this client does not know about.
    #[serde(other)]
    Other,
}

impl UserRole {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Anonymous => "anonymous",
            Self::Other => "other",
        }
    }
}

/// A user as returned by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Email address, absent for anonymous users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Role classification.
    #[serde(default)]
    pub role: UserRole,
    /// Whether the identity was created by anonymous sign-in.
    #[serde(default)]
    pub is_anonymous: bool,
    /// When the account was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a member user with the given ID and email.
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            display_name: None,
            role: UserRole::Member,
            is_anonymous: false,
            created_at: None,
        }
    }

    /// Creates an anonymous user with the given ID.
    #[must_use]
    pub const fn anonymous(id: UserId) -> Self {
        Self {
            id,
            email: None,
            display_name: None,
            role: UserRole::Anonymous,
            is_anonymous: true,
            created_at: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// True when either the flag or the role marks this user as a guest.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous || self.role == UserRole::Anonymous
    }

    /// Name suitable for display: display name, then email, then ID.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("user-123").unwrap().as_str(), "user-123");
    }

    #[test]
    fn test_decoding_rejects_blank_user_id() {
        assert!(serde_json::from_value::<UserId>(json!("  ")).is_err());
        assert!(serde_json::from_value::<User>(json!({ "id": "", "role": "member" })).is_err());

        let id: UserId = serde_json::from_value(json!("user-9")).unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("user-9"));
    }

    #[test]
    fn test_user_decodes_camel_case_and_ignores_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "user-123",
            "email": "ada@example.com",
            "displayName": "Ada",
            "role": "admin",
            "isAnonymous": false,
            "createdAt": "2026-01-02T03:04:05Z",
            "plan": "pro"
        }))
        .unwrap();

        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.created_at.is_some());
        assert_eq!(user.label(), "Ada");
    }

    #[test]
    fn test_user_minimal_payload_uses_defaults() {
        let user: User = serde_json::from_value(json!({ "id": "user-1" })).unwrap();
        assert_eq!(user.role, UserRole::Member);
        assert!(!user.is_anonymous());
        assert_eq!(user.label(), "user-1");
    }

    #[test]
    fn test_unknown_role_maps_to_other() {
        let user: User =
            serde_json::from_value(json!({ "id": "u", "role": "superuser" })).unwrap();
        assert_eq!(user.role, UserRole::Other);
    }

    #[test]
    fn test_anonymous_detection() {
        let by_role: User =
            serde_json::from_value(json!({ "id": "g1", "role": "anonymous" })).unwrap();
        assert!(by_role.is_anonymous());

        let by_flag: User =
            serde_json::from_value(json!({ "id": "g2", "isAnonymous": true })).unwrap();
        assert!(by_flag.is_anonymous());

        let guest = User::anonymous(UserId::new("g3").unwrap());
        assert!(guest.is_anonymous());
        assert_eq!(guest.email, None);
    }

    #[test]
    fn test_user_serializes_without_absent_fields() {
        let user = User::new(UserId::new("user-9").unwrap(), "x@example.com");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "user-9",
                "email": "x@example.com",
                "role": "member",
                "isAnonymous": false
            })
        );
    }
}
