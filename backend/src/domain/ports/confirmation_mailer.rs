//! Driving port for confirmation email delivery.

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a confirmation email.
    pub enum MailDeliveryError {
        /// Required mail settings are missing.
        Configuration { message: String } =>
            "email configuration error: {message}",
        /// The transport could not be built or verified.
        Initialization { message: String } =>
            "email service initialization failed: {message}",
        /// The recipient details failed validation.
        Validation { message: String } =>
            "confirmation email rejected: {message}",
        /// The single delivery attempt failed.
        Send { message: String } =>
            "confirmation email could not be sent: {message}",
    }
}

impl MailDeliveryError {
    /// Message safe to show to API clients.
    ///
    /// Transport diagnostics stay in the server logs.
    ///
    /// # Examples
    /// ```
    /// use registration::domain::ports::MailDeliveryError;
    ///
    /// let err = MailDeliveryError::send("550 mailbox unavailable");
    /// assert_eq!(err.client_message(), "Failed to send confirmation email");
    /// ```
    pub fn client_message(&self) -> String {
        match self {
            Self::Configuration { .. } => "Email service configuration is incomplete".to_owned(),
            Self::Initialization { .. } => "Failed to initialize email service".to_owned(),
            Self::Validation { message } => message.clone(),
            Self::Send { .. } => "Failed to send confirmation email".to_owned(),
        }
    }
}

/// Proof of a delivered confirmation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailReceipt {
    pub message_id: String,
    pub recipient: EmailAddress,
}

/// Sends confirmation emails and reports mail server reachability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    /// Deliver the welcome email to `email`, addressed to `name`.
    ///
    /// Inputs are validated again before rendering. Exactly one delivery
    /// attempt is made.
    async fn send_confirmation(
        &self,
        name: &str,
        email: &str,
    ) -> Result<MailReceipt, MailDeliveryError>;

    /// Report whether the mail server currently accepts connections.
    ///
    /// Returns an error only when the transport cannot be set up at all.
    async fn test_connection(&self) -> Result<bool, MailDeliveryError>;
}
