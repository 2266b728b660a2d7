//! Domain ports: the traits adapters implement (driven) and the use-case
//! traits inbound adapters call (driving).

mod macros;
pub(crate) use macros::define_port_error;

mod user_command;
mod user_operation_metrics;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_operation_metrics::MockUserOperationMetrics;
pub use user_operation_metrics::{
    NoOpUserOperationMetrics, OperationOutcome, UserOperation, UserOperationMetrics,
    UserOperationMetricsError, UserOperationRecord,
};
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
