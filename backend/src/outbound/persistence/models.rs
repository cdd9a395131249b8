//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! into domain values before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{jokes, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "user rows are never updated after registration")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for registering users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the jokes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jokes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JokeRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Narrow projection for list views.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jokes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JokeSummaryRow {
    pub id: Uuid,
    pub name: String,
}

/// Insertable struct for creating jokes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = jokes)]
pub(crate) struct NewJokeRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub content: &'a str,
}
