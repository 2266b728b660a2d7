//! Domain primitives, ports, and the user service.
//!
//! Purpose: define the user record, its validation rules, and the service
//! that implements user CRUD against the [`ports::UserRepository`] driven
//! port. Nothing in this module knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, UserId, UserProfile: the user record and its parts.
//! - ProfileValidator: name and email pattern checks.
//! - UserService: implements the user command and query ports.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserProfile};
pub use self::user_service::{UserService, UserServicePolicy};
pub use self::validation::{
    EmailPattern, FieldValidator, NamePattern, ProfileValidationError, ProfileValidator,
};
