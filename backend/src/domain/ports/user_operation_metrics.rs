//! Domain port for observing user operations.
//!
//! The service reports every operation's kind, outcome, and elapsed time.
//! Implementations may log, export to Prometheus, or discard the record. A
//! failing recorder never changes the response of the operation it observes.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ErrorCode;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording user operation metrics.
    pub enum UserOperationMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "user operation metrics exporter failed: {message}",
    }
}

/// The four user operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserOperation {
    /// `POST /user/`
    Create,
    /// `GET /user/{user_id}`
    Get,
    /// `PUT /user/{user_id}`
    Update,
    /// `DELETE /user/{user_id}`
    Delete,
}

impl UserOperation {
    /// Label value used by metric backends.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
    /// The operation completed.
    Success,
    /// Input was rejected by validation.
    InvalidRequest,
    /// The user did not exist.
    NotFound,
    /// The email was already taken.
    Conflict,
    /// The store or another dependency failed.
    Failure,
}

impl OperationOutcome {
    /// Classify an error code.
    pub fn from_code(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InvalidRequest => Self::InvalidRequest,
            ErrorCode::NotFound => Self::NotFound,
            ErrorCode::Conflict => Self::Conflict,
            _ => Self::Failure,
        }
    }

    /// Label value used by metric backends.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidRequest => "invalid_request",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Failure => "failure",
        }
    }
}

/// One observed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOperationRecord {
    /// Which operation ran.
    pub operation: UserOperation,
    /// How it ended.
    pub outcome: OperationOutcome,
    /// Wall-clock time spent inside the service.
    pub elapsed: Duration,
}

/// Observability hook invoked after each user operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserOperationMetrics: Send + Sync {
    /// Record one completed operation.
    async fn record(&self, record: &UserOperationRecord) -> Result<(), UserOperationMetricsError>;
}

/// Recorder that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUserOperationMetrics;

#[async_trait]
impl UserOperationMetrics for NoOpUserOperationMetrics {
    async fn record(&self, _record: &UserOperationRecord) -> Result<(), UserOperationMetricsError> {
        Ok(())
    }
}
