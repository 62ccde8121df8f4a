//! Registration domain service.
//!
//! Sequences one registration: validate, normalise, duplicate check, insert,
//! confirmation email, delivery bookkeeping. Email delivery never decides
//! whether the registration succeeded.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    ConfirmationMailer, MailDeliveryError, RegistrationCommand, RegistrationOutcome,
    RegistrationRequest, UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{Error, Registrant, User, UserId, UserValidationError, validate_registration};

/// Message returned when the normalised email already exists.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email address is already registered";
/// Message returned when input validation fails.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Registration service implementing the registration and listing ports.
#[derive(Clone)]
pub struct RegistrationService<R, M> {
    users: Arc<R>,
    mailer: Arc<M>,
}

impl<R, M> RegistrationService<R, M> {
    /// Create a new service over the given repository and mailer.
    pub fn new(users: Arc<R>, mailer: Arc<M>) -> Self {
        Self { users, mailer }
    }
}

fn validation_error(violations: Vec<UserValidationError>) -> Error {
    Error::invalid_request(VALIDATION_FAILED_MESSAGE)
        .with_errors(violations.iter().map(ToString::to_string).collect())
}

fn map_lookup_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
        UserPersistenceError::NotFound { message } => {
            Error::internal(format!("unexpected missing user: {message}"))
        }
        UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
            Error::internal(format!("error checking for duplicate email: {message}"))
        }
    }
}

fn map_create_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
        UserPersistenceError::NotFound { message }
        | UserPersistenceError::Connection { message }
        | UserPersistenceError::Query { message } => {
            Error::internal(format!("failed to create user: {message}"))
        }
    }
}

fn map_list_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected duplicate while listing users: {email}"))
        }
        UserPersistenceError::NotFound { message }
        | UserPersistenceError::Connection { message }
        | UserPersistenceError::Query { message } => {
            Error::internal(format!("failed to list users: {message}"))
        }
    }
}

impl<R, M> RegistrationService<R, M>
where
    R: UserRepository,
    M: ConfirmationMailer,
{
    async fn ensure_email_available(&self, registrant: &Registrant) -> Result<(), Error> {
        match self.users.find_by_email(&registrant.email).await {
            Ok(existing) => {
                info!(user_id = %existing.id(), "registration rejected: email already registered");
                Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE))
            }
            Err(UserPersistenceError::NotFound { .. }) => {
                debug!(email = %registrant.email, "email not yet registered");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "duplicate email check failed");
                Err(map_lookup_error(err))
            }
        }
    }

    /// Deliver the confirmation email and return `(email_sent, email_error)`.
    async fn deliver_confirmation(
        &self,
        user_id: UserId,
        registrant: &Registrant,
    ) -> (bool, Option<String>) {
        let sent = self
            .mailer
            .send_confirmation(registrant.name.as_ref(), registrant.email.as_ref())
            .await;
        match sent {
            Ok(receipt) => {
                if let Err(err) = self.users.mark_email_sent(user_id).await {
                    warn!(
                        error = %err,
                        %user_id,
                        message_id = %receipt.message_id,
                        "confirmation email sent but delivery status not recorded"
                    );
                }
                (true, None)
            }
            Err(err) => {
                match &err {
                    MailDeliveryError::Configuration { .. } => {
                        error!(error = %err, %user_id, "confirmation email not sent");
                    }
                    MailDeliveryError::Initialization { .. }
                    | MailDeliveryError::Validation { .. }
                    | MailDeliveryError::Send { .. } => {
                        warn!(error = %err, %user_id, "confirmation email not sent");
                    }
                }
                (false, Some(err.client_message()))
            }
        }
    }
}

#[async_trait]
impl<R, M> RegistrationCommand for RegistrationService<R, M>
where
    R: UserRepository,
    M: ConfirmationMailer,
{
    async fn register(&self, request: RegistrationRequest) -> Result<RegistrationOutcome, Error> {
        let registrant = validate_registration(request.name.as_deref(), request.email.as_deref())
            .map_err(validation_error)?;

        self.ensure_email_available(&registrant).await?;

        let user_id = self
            .users
            .create(&registrant.name, &registrant.email)
            .await
            .map_err(|err| {
                match &err {
                    UserPersistenceError::DuplicateEmail { .. } => {
                        info!("registration lost a race on the email uniqueness constraint");
                    }
                    _ => error!(error = %err, "failed to create user"),
                }
                map_create_error(err)
            })?;
        info!(%user_id, email = %registrant.email, "user registered");

        let (email_sent, email_error) = self.deliver_confirmation(user_id, &registrant).await;

        Ok(RegistrationOutcome {
            user_id,
            name: registrant.name,
            email: registrant.email,
            email_sent,
            email_error,
        })
    }
}

#[async_trait]
impl<R, M> UsersQuery for RegistrationService<R, M>
where
    R: UserRepository,
    M: ConfirmationMailer,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list_all().await.map_err(|err| {
            error!(error = %err, "failed to list users");
            map_list_error(err)
        })
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
