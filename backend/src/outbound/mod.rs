//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL-backed user repository using Diesel ORM
//! - **memory**: process-local user repository
//! - **metrics**: log and Prometheus recorders for user operations
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod memory;
pub mod metrics;
pub mod persistence;
