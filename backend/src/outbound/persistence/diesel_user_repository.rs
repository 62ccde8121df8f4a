//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The `users_email_key` unique constraint is the source of truth for email
//! uniqueness; a violation on insert is reported as
//! [`UserPersistenceError::DuplicateEmail`].

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, UserName};

use super::models::{EmailSentUpdate, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// `clock` stamps `email_sent_at`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Probe { message } => UserPersistenceError::connection(message),
    }
}

/// Map Diesel errors to domain user persistence errors.
///
/// `email` names the address being written when the query is an insert, so a
/// uniqueness violation can be reported against it.
fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match (error, email) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), Some(email)) => {
            UserPersistenceError::duplicate_email(email)
        }
        (DieselError::NotFound, _) => UserPersistenceError::not_found("no matching user"),
        (DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _), _) => {
            UserPersistenceError::connection("database connection error")
        }
        (DieselError::QueryBuilderError(_), _) => {
            UserPersistenceError::query("database query error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let name = UserName::new(&row.name).map_err(|err| {
        UserPersistenceError::query(format!("stored name for user {} is invalid: {err}", row.id))
    })?;
    let email = EmailAddress::new(&row.email).map_err(|err| {
        UserPersistenceError::query(format!("stored email for user {} is invalid: {err}", row.id))
    })?;
    Ok(User::new(
        UserId::new(row.id),
        name,
        email,
        row.created_at,
        row.email_sent_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        name: &UserName,
        email: &EmailAddress,
    ) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: name.as_ref(),
            email: email.as_ref(),
        };

        let id: i64 = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(email.as_ref())))?;

        Ok(UserId::new(id))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        match row {
            Some(row) => row_to_user(row),
            None => Err(UserPersistenceError::not_found(email.as_ref())),
        }
    }

    async fn mark_email_sent(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = EmailSentUpdate {
            email_sent: true,
            email_sent_at: self.clock.utc(),
        };
        let updated = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        if updated == 0 {
            return Err(UserPersistenceError::not_found(format!("user {id}")));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order((users::created_at.desc(), users::id.desc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_user).collect()
    }
}
