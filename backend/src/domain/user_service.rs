//! User CRUD domain service.
//!
//! Implements the [`UserCommand`] and [`UserQuery`] driving ports over a
//! [`UserRepository`]. The service holds no cross-request state; every call is
//! validation followed by one or more independent repository round-trips.
//!
//! The email check before an insert or update is advisory. Two concurrent
//! writers can both pass it; the store's uniqueness constraint then rejects
//! the loser, which surfaces as [`ErrorCode::Conflict`](crate::domain::ErrorCode).

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    NoOpUserOperationMetrics, OperationOutcome, UserCommand, UserOperation, UserOperationMetrics,
    UserOperationRecord, UserPersistenceError, UserQuery, UserRepository,
};
use crate::domain::{Error, ProfileValidationError, ProfileValidator, UserId, UserProfile};

const USER_NOT_FOUND: &str = "User not found";
const EMAIL_IN_USE: &str = "Email already in use";

/// Behaviour switches for [`UserService`].
///
/// # Examples
/// ```
/// use user_registry::domain::UserServicePolicy;
///
/// let policy = UserServicePolicy::default();
/// assert!(policy.strict_validation);
/// assert!(policy.require_existing);
/// assert!(!UserServicePolicy::lenient().strict_validation);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserServicePolicy {
    /// Check names and emails against their patterns.
    pub strict_validation: bool,
    /// Report `NotFound` when updating or deleting a missing user. When
    /// disabled, delete is idempotent and update skips its pre-check read.
    pub require_existing: bool,
}

impl UserServicePolicy {
    /// Validation on, missing users reported.
    pub const fn strict() -> Self {
        Self {
            strict_validation: true,
            require_existing: true,
        }
    }

    /// Validation off, idempotent delete.
    pub const fn lenient() -> Self {
        Self {
            strict_validation: false,
            require_existing: false,
        }
    }
}

impl Default for UserServicePolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// User CRUD service.
pub struct UserService<R: ?Sized> {
    repository: Arc<R>,
    metrics: Arc<dyn UserOperationMetrics>,
    validator: ProfileValidator,
    require_existing: bool,
}

impl<R: ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            metrics: Arc::clone(&self.metrics),
            validator: self.validator.clone(),
            require_existing: self.require_existing,
        }
    }
}

impl<R: ?Sized> UserService<R> {
    /// Create a service over `repository` with no-op metrics.
    pub fn new(repository: Arc<R>, policy: UserServicePolicy) -> Self {
        let validator = if policy.strict_validation {
            ProfileValidator::strict()
        } else {
            ProfileValidator::disabled()
        };
        Self {
            repository,
            metrics: Arc::new(NoOpUserOperationMetrics),
            validator,
            require_existing: policy.require_existing,
        }
    }

    /// Replace the operation metrics hook.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn UserOperationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the profile validator.
    #[must_use]
    pub fn with_validator(mut self, validator: ProfileValidator) -> Self {
        self.validator = validator;
        self
    }
}

fn map_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail => Error::conflict(EMAIL_IN_USE),
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_validation_error(err: ProfileValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

impl<R> UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn observed<T, Fut>(&self, operation: UserOperation, fut: Fut) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, Error>> + Send,
    {
        let started = Instant::now();
        let result = fut.await;
        let outcome = match &result {
            Ok(_) => OperationOutcome::Success,
            Err(err) => OperationOutcome::from_code(err.code()),
        };
        let record = UserOperationRecord {
            operation,
            outcome,
            elapsed: started.elapsed(),
        };
        if let Err(err) = self.metrics.record(&record).await {
            warn!(
                error = %err,
                operation = operation.as_str(),
                "failed to record user operation metrics"
            );
        }
        result
    }

    fn validate(&self, profile: &UserProfile) -> Result<(), Error> {
        self.validator.check(profile).map_err(map_validation_error)
    }

    /// Fail with `Conflict` when `email` belongs to a user other than `owner`.
    async fn ensure_email_available(
        &self,
        email: &str,
        owner: Option<UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .repository
            .find_id_by_email(email)
            .await
            .map_err(map_persistence_error)?;
        match existing {
            Some(id) if Some(id) != owner => Err(Error::conflict(EMAIL_IN_USE)),
            _ => Ok(()),
        }
    }

    async fn create(&self, profile: UserProfile) -> Result<UserId, Error> {
        self.validate(&profile)?;
        self.ensure_email_available(profile.email(), None).await?;
        let id = self
            .repository
            .insert(&profile)
            .await
            .map_err(map_persistence_error)?;
        debug!(user_id = %id, "user created");
        Ok(id)
    }

    async fn get(&self, id: UserId) -> Result<UserProfile, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .map(|user| user.into_profile())
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn update(&self, id: UserId, profile: UserProfile) -> Result<UserProfile, Error> {
        self.validate(&profile)?;
        if self.require_existing {
            let existing = self
                .repository
                .find_by_id(id)
                .await
                .map_err(map_persistence_error)?;
            if existing.is_none() {
                return Err(Error::not_found(USER_NOT_FOUND));
            }
        }
        self.ensure_email_available(profile.email(), Some(id)).await?;
        let updated = self
            .repository
            .update(id, &profile)
            .await
            .map_err(map_persistence_error)?;
        if !updated {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        debug!(user_id = %id, "user updated");
        Ok(profile)
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if !removed && self.require_existing {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        debug!(user_id = %id, removed, "user delete processed");
        Ok(())
    }
}

#[async_trait]
impl<R> UserCommand for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn create_user(&self, profile: UserProfile) -> Result<UserId, Error> {
        self.observed(UserOperation::Create, self.create(profile))
            .await
    }

    async fn update_user(&self, id: UserId, profile: UserProfile) -> Result<UserProfile, Error> {
        self.observed(UserOperation::Update, self.update(id, profile))
            .await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        self.observed(UserOperation::Delete, self.delete(id)).await
    }
}

#[async_trait]
impl<R> UserQuery for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn get_user(&self, id: UserId) -> Result<UserProfile, Error> {
        self.observed(UserOperation::Get, self.get(id)).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
