//! Domain primitives, services and ports.
//!
//! Purpose: keep registration rules and the confirmation mail lifecycle
//! independent of HTTP, Diesel and SMTP. Adapters depend on this module, never
//! the other way round.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User and its value objects, plus the shared registration validator.
//! - RegistrationService: drives one registration end to end.
//! - MailTransporter: lazily initialised confirmation mailer.

pub mod confirmation_template;
pub mod error;
pub mod mail_config;
pub mod mail_transporter;
pub mod ports;
pub mod registration_service;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::mail_transporter::{MailTransporter, TransporterStatus};
pub use self::registration_service::RegistrationService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, FIELD_MAX, Registrant, User, UserId, UserName, UserValidationError,
    validate_registration,
};
