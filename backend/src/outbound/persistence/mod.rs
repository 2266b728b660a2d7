//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Provides the [`DieselUserRepository`] implementation of the domain's
//! `UserRepository` port, backed by `diesel-async` with `bb8` pooling.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - All Diesel and pool failures are mapped to `UserPersistenceError`.
//!
//! # Example
//!
//! ```no_run
//! use user_registry::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn build() -> Result<(), user_registry::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let repo = DieselUserRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
