//! Shared helpers for integration tests.

pub mod pg_embed;
