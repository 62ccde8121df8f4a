//! Diesel row types for the `users` table.
//!
//! Internal to the persistence adapter; the domain never sees these.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "derived from email_sent_at in the domain model")]
    pub email_sent: bool,
    pub email_sent_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating new user records.
///
/// `created_at`, `email_sent` and `email_sent_at` take their column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// Changeset recording a delivered confirmation email.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct EmailSentUpdate {
    pub email_sent: bool,
    pub email_sent_at: DateTime<Utc>,
}
