//! User record model.
//!
//! A user is a store-assigned [`UserId`] plus a mutable [`UserProfile`]
//! (name and email). Pattern checks on the profile live in
//! [`crate::domain::validation`] because they are switched by policy.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned user identifier.
///
/// Identifiers come from the `users.id` sequence, are never reused, and never
/// change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable part of a user record.
///
/// This is both the body of create/update requests and the body of get/update
/// responses.
///
/// # Examples
/// ```
/// use user_registry::domain::UserProfile;
///
/// let profile = UserProfile::new("Ada", "ada@example.com");
/// assert_eq!(profile.name(), "Ada");
/// assert_eq!(profile.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = "O'Brien-Smith")]
    name: String,
    #[schema(example = "a.b+c@example.co")]
    email: String,
}

impl UserProfile {
    /// Build a profile from its parts. No validation is applied here.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email address; unique across all users.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    profile: UserProfile,
}

impl User {
    /// Combine a store-assigned id with its profile.
    pub fn new(id: UserId, profile: UserProfile) -> Self {
        Self { id, profile }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Current name and email.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Consume the user and keep only the profile.
    pub fn into_profile(self) -> UserProfile {
        self.profile
    }
}
