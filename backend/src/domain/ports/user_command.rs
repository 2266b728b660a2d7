//! Driving port for user mutations.
//!
//! Inbound adapters call this port; the domain service implements it.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

/// Use-case port for creating, updating, and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Create a user and return the store-assigned id.
    async fn create_user(&self, profile: UserProfile) -> Result<UserId, Error>;

    /// Replace the name and email of an existing user.
    async fn update_user(&self, id: UserId, profile: UserProfile) -> Result<UserProfile, Error>;

    /// Permanently remove a user.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
