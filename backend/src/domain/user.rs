//! User account model.
//!
//! Roles and account statuses are deliberately open-ended strings: the
//! administrative PATCH paths accept any value, so the newtypes here only
//! provide well-known constants and predicates rather than a closed enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role flag.
///
/// # Examples
/// ```
/// use diagnostics_backend::domain::UserRole;
///
/// assert!(UserRole::admin().is_admin());
/// assert!(!UserRole::new("lab-technician").is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserRole(String);

impl UserRole {
    /// Well-known role granted on registration.
    pub const USER: &'static str = "user";
    /// Well-known role checked by the admin flag endpoint.
    pub const ADMIN: &'static str = "admin";

    /// Wrap an arbitrary role string; no value is rejected.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The default role assigned to new registrations.
    pub fn user() -> Self {
        Self(Self::USER.to_owned())
    }

    /// The administrative role.
    pub fn admin() -> Self {
        Self(Self::ADMIN.to_owned())
    }

    /// Whether this role grants administrative access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }

    /// Borrow the underlying role string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status flag.
///
/// Suspended accounts are stored as `block` (not `blocked`); existing data
/// and clients rely on that spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccountStatus(String);

impl AccountStatus {
    /// Well-known status granted on registration.
    pub const ACTIVE: &'static str = "active";
    /// Well-known status checked by the blocked flag endpoint.
    pub const BLOCKED: &'static str = "block";

    /// Wrap an arbitrary status string; no value is rejected.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The default status assigned to new registrations.
    pub fn active() -> Self {
        Self(Self::ACTIVE.to_owned())
    }

    /// The suspended status.
    pub fn blocked() -> Self {
        Self(Self::BLOCKED.to_owned())
    }

    /// Whether this status marks the account as suspended.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.0 == Self::BLOCKED
    }

    /// Borrow the underlying status string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique registration email; the natural key for lookups.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar reference, serialized under the legacy wire name `photoURL`.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    /// Blood group, free text.
    pub blood_group: Option<String>,
    /// Home district.
    pub district: Option<String>,
    /// Home upazilla.
    pub upazilla: Option<String>,
    /// Role flag, `user` on registration.
    pub role: UserRole,
    /// Status flag, `active` on registration.
    pub status: AccountStatus,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when registering a user.
///
/// Role and status are not part of the registration payload; the backend
/// forces them to `user`/`active` regardless of what a client submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    /// Registration email, the unique key.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar reference.
    pub photo_url: Option<String>,
    /// Blood group.
    pub blood_group: Option<String>,
    /// Home district.
    pub district: Option<String>,
    /// Home upazilla.
    pub upazilla: Option<String>,
}
