//! Port for registered user persistence.
//!
//! Storage owns the uniqueness guarantee on email addresses. Adapters must
//! surface a late uniqueness violation as
//! [`UserPersistenceError::DuplicateEmail`] so callers can treat it like a
//! pre-check hit.

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Another row already holds this email address.
        DuplicateEmail { email: String } =>
            "email address {email} is already registered",
        /// No row matched the lookup.
        NotFound { message: String } =>
            "user not found: {message}",
        /// A connection could not be checked out of the pool.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Persistence operations over the `users` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the generated identifier.
    ///
    /// The row starts with `email_sent = false` and no `email_sent_at`.
    async fn create(
        &self,
        name: &UserName,
        email: &EmailAddress,
    ) -> Result<UserId, UserPersistenceError>;

    /// Fetch the user registered under `email`.
    ///
    /// Returns [`UserPersistenceError::NotFound`] when no row matches. That is
    /// an expected outcome during the duplicate check.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<User, UserPersistenceError>;

    /// Record a successful confirmation delivery for `id`.
    async fn mark_email_sent(&self, id: UserId) -> Result<(), UserPersistenceError>;

    /// All users, newest first.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_email_message_names_the_address() {
        let err = UserPersistenceError::duplicate_email("ada@example.com");
        assert_eq!(
            err.to_string(),
            "email address ada@example.com is already registered"
        );
    }
}
