//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

/// Use-case port for reading a user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Return the name and email of `id`.
    async fn get_user(&self, id: UserId) -> Result<UserProfile, Error>;
}
