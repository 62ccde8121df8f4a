//! Driving port for user registration.
//!
//! Inbound adapters hand over the raw request fields. Validation,
//! normalisation, persistence and confirmation delivery all happen behind
//! this port.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{EmailAddress, Error, UserId, UserName};

/// Raw registration input.
///
/// Fields are optional so an absent key produces the same validation message
/// as an empty one. A key holding anything other than a JSON string is read
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegistrationRequest {
    /// Person's display name.
    #[schema(example = "Ada Lovelace")]
    #[serde(default, deserialize_with = "string_or_absent")]
    pub name: Option<String>,
    /// Address the confirmation email goes to.
    #[schema(example = "ada@example.com")]
    #[serde(default, deserialize_with = "string_or_absent")]
    pub email: Option<String>,
}

fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => Some(raw),
        _ => None,
    })
}

/// Terminal result of a registration that persisted a user.
///
/// A failed confirmation email does not fail the registration; it is
/// reported through `email_sent` and `email_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub user_id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub email_sent: bool,
    /// Client-safe reason the confirmation email was not delivered.
    pub email_error: Option<String>,
}

/// Domain use-case port for registering users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Register a user and attempt one confirmation delivery.
    ///
    /// # Errors
    ///
    /// - [`crate::domain::ErrorCode::InvalidRequest`] listing every violated
    ///   rule.
    /// - [`crate::domain::ErrorCode::Conflict`] when the normalised email is
    ///   already registered.
    /// - [`crate::domain::ErrorCode::InternalError`] for storage failures.
    async fn register(&self, request: RegistrationRequest) -> Result<RegistrationOutcome, Error>;
}
