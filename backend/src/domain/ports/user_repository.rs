//! Port abstraction for user persistence adapters and their errors.
//!
//! Each method is one store round-trip in its own transaction. The store owns
//! the email uniqueness constraint; adapters report its violation as
//! [`UserPersistenceError::DuplicateEmail`] so concurrent writers that both
//! passed the service's advisory check still resolve to one winner.

use async_trait::async_trait;

use crate::domain::{User, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email uniqueness constraint rejected an insert or update.
        DuplicateEmail => "email address is already bound to another user",
    }
}

/// Storage for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Return the id of the user owning `email`, if any.
    async fn find_id_by_email(&self, email: &str) -> Result<Option<UserId>, UserPersistenceError>;

    /// Insert a new row and return its store-assigned id.
    async fn insert(&self, profile: &UserProfile) -> Result<UserId, UserPersistenceError>;

    /// Overwrite name and email of `id`; `false` when no row matched.
    async fn update(
        &self,
        id: UserId,
        profile: &UserProfile,
    ) -> Result<bool, UserPersistenceError>;

    /// Remove `id`; `false` when no row matched.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
