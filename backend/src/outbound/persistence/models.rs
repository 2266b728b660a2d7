//! Internal Diesel row structs for the `users` table.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use crate::domain::{User, UserId, UserProfile};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::new(row.id), UserProfile::new(row.name, row.email))
    }
}

/// Insertable struct for creating new user records. The id comes from the
/// sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// Changeset struct for overwriting an existing user's profile.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a UserProfile> for NewUserRow<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            name: profile.name(),
            email: profile.email(),
        }
    }
}

impl<'a> From<&'a UserProfile> for UserProfileUpdate<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            name: profile.name(),
            email: profile.email(),
        }
    }
}
