//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `migrations/*_create_users/up.sql`; apply it with the Diesel
//! CLI before pointing the service at a database.

diesel::table! {
    /// Registered users.
    ///
    /// `email` carries a `UNIQUE` constraint; violations surface as
    /// `DatabaseErrorKind::UniqueViolation`.
    users (id) {
        /// Primary key from a `BIGSERIAL` sequence.
        id -> Int8,
        /// Display name.
        name -> Text,
        /// Email address, unique across rows.
        email -> Text,
    }
}
