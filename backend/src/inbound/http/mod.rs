//! HTTP inbound adapter exposing the `/user` REST resource.

pub mod api_key;
pub mod error;
pub mod health;
pub mod state;
pub mod trace;
pub mod users;

pub use error::ApiResult;
