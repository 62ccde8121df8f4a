//! Registered user model and the shared registration validator.
//!
//! [`validate_registration`] is the single place where name and email rules
//! live. The HTTP adapter, the registration service and the mail transporter
//! all call it, so the rules cannot drift apart.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of characters accepted for a name or email address.
pub const FIELD_MAX: usize = 255;

/// Rule violations reported by the shared validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name absent or blank after trimming.
    #[error("Name is required and must be a non-empty string")]
    NameMissing,
    /// Name longer than [`FIELD_MAX`] characters after trimming.
    #[error("Name must be less than 255 characters")]
    NameTooLong,
    /// Email absent or blank after trimming.
    #[error("Email is required and must be a non-empty string")]
    EmailMissing,
    /// Email does not look like `local@domain.tld`.
    #[error("Email must be a valid email address")]
    EmailInvalid,
    /// Email longer than [`FIELD_MAX`] characters after trimming.
    #[error("Email must be less than 255 characters")]
    EmailTooLong,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Surrogate identifier assigned by storage on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a storage-generated identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed, non-empty user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and normalise a name.
    ///
    /// # Examples
    /// ```
    /// use registration::domain::UserName;
    ///
    /// let name = UserName::new("  Ada ").expect("valid name");
    /// assert_eq!(name.as_ref(), "Ada");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::NameMissing);
        }
        if trimmed.chars().count() > FIELD_MAX {
            return Err(UserValidationError::NameTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trimmed, lower-cased email address.
///
/// Two inputs that differ only in surrounding whitespace or letter case
/// produce equal values, which is what the uniqueness constraint relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use registration::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  A@B.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "a@b.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmailMissing);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::EmailInvalid);
        }
        let normalised = trimmed.to_lowercase();
        if normalised.chars().count() > FIELD_MAX {
            return Err(UserValidationError::EmailTooLong);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    pub name: UserName,
    pub email: EmailAddress,
}

/// Validate a raw name/email pair, collecting every violated rule.
///
/// Absent fields are reported the same way as blank ones. On success both
/// values are normalised.
///
/// # Examples
/// ```
/// use registration::domain::{validate_registration, UserValidationError};
///
/// let violations = validate_registration(Some(""), Some("nope")).unwrap_err();
/// assert_eq!(
///     violations,
///     vec![UserValidationError::NameMissing, UserValidationError::EmailInvalid]
/// );
/// ```
pub fn validate_registration(
    name: Option<&str>,
    email: Option<&str>,
) -> Result<Registrant, Vec<UserValidationError>> {
    let name = UserName::new(name.unwrap_or_default());
    let email = EmailAddress::new(email.unwrap_or_default());
    match (name, email) {
        (Ok(name), Ok(email)) => Ok(Registrant { name, email }),
        (name, email) => Err([name.err(), email.err()].into_iter().flatten().collect()),
    }
}

/// Persisted user record.
///
/// ## Invariants
/// - `email_sent` is `true` exactly when `email_sent_at` is set.
/// - `created_at` never changes after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i64, example = 42)]
    id: UserId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    name: UserName,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    created_at: DateTime<Utc>,
    email_sent: bool,
    email_sent_at: Option<DateTime<Utc>>,
}

impl User {
    /// Rebuild a user from stored components.
    ///
    /// `email_sent` is derived from the presence of `email_sent_at`.
    pub fn new(
        id: UserId,
        name: UserName,
        email: EmailAddress,
        created_at: DateTime<Utc>,
        email_sent_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
            email_sent: email_sent_at.is_some(),
            email_sent_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether a confirmation email was delivered.
    pub fn email_sent(&self) -> bool {
        self.email_sent
    }

    pub fn email_sent_at(&self) -> Option<DateTime<Utc>> {
        self.email_sent_at
    }
}

#[cfg(test)]
mod tests;
