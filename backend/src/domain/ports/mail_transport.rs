//! Ports for the SMTP client the confirmation mailer drives.
//!
//! [`MailTransportFactory`] turns resolved [`MailSettings`] into a live
//! [`MailTransport`]. The domain keeps the lifecycle (lazy build, verify,
//! reuse); adapters only know how to talk to a server.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::mail_config::MailSettings;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transport adapters.
    pub enum MailTransportError {
        /// The client could not be constructed from the settings.
        Build { message: String } =>
            "mail transport could not be built: {message}",
        /// The server did not accept a verification round-trip.
        Verify { message: String } =>
            "mail transport verification failed: {message}",
        /// The outgoing message could not be assembled.
        Message { message: String } =>
            "mail message could not be built: {message}",
        /// The server rejected or dropped the message.
        Delivery { message: String } =>
            "mail delivery failed: {message}",
    }
}

/// Fully rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub sender_name: String,
    pub sender_address: String,
    pub recipient: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// A connected SMTP client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Perform a connection round-trip with the server.
    async fn verify(&self) -> Result<(), MailTransportError>;

    /// Deliver `mail` once and return the message identifier.
    async fn deliver(&self, mail: &OutgoingMail) -> Result<String, MailTransportError>;
}

/// Builds transports from settings.
#[cfg_attr(test, mockall::automock)]
pub trait MailTransportFactory: Send + Sync {
    /// Construct a transport without contacting the server.
    fn build(&self, settings: &MailSettings) -> Result<Arc<dyn MailTransport>, MailTransportError>;
}
