//! Lifecycle of the process-wide confirmation mail transport.
//!
//! The transport is built lazily on first use, verified against the server
//! and then reused. A failed attempt is not cached: the next call starts
//! again from configuration. Only one initialisation runs at a time.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::domain::confirmation_template;
use crate::domain::mail_config::{MailEnv, MailSettings};
use crate::domain::ports::{
    ConfirmationMailer, MailDeliveryError, MailReceipt, MailTransport, MailTransportFactory,
    OutgoingMail,
};
use crate::domain::validate_registration;

/// Observable state of the transporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransporterStatus {
    /// No attempt has been made yet.
    Uninitialized,
    /// A verified transport is cached.
    Initialized,
    /// The last attempt failed; the next call retries.
    InitializationFailed,
}

#[derive(Clone)]
struct ReadyTransport {
    transport: Arc<dyn MailTransport>,
    settings: Arc<MailSettings>,
}

enum TransporterState {
    Uninitialized,
    Initialized(ReadyTransport),
    InitializationFailed,
}

/// Lazily initialised confirmation mailer.
///
/// Construct once at startup and share it behind an `Arc`.
pub struct MailTransporter {
    env: Arc<dyn MailEnv>,
    factory: Arc<dyn MailTransportFactory>,
    clock: Arc<dyn Clock>,
    state: RwLock<TransporterState>,
    init_gate: Mutex<()>,
}

impl MailTransporter {
    /// Create an uninitialised transporter.
    ///
    /// Nothing is read from `env` until the first send, connection test or
    /// explicit [`MailTransporter::initialize`].
    pub fn new(
        env: Arc<dyn MailEnv>,
        factory: Arc<dyn MailTransportFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            env,
            factory,
            clock,
            state: RwLock::new(TransporterState::Uninitialized),
            init_gate: Mutex::new(()),
        }
    }

    /// Current lifecycle state.
    pub async fn status(&self) -> TransporterStatus {
        match *self.state.read().await {
            TransporterState::Uninitialized => TransporterStatus::Uninitialized,
            TransporterState::Initialized(_) => TransporterStatus::Initialized,
            TransporterState::InitializationFailed => TransporterStatus::InitializationFailed,
        }
    }

    /// Build and verify the transport unless one is already cached.
    ///
    /// # Errors
    ///
    /// - [`MailDeliveryError::Configuration`] when credentials are missing.
    /// - [`MailDeliveryError::Initialization`] when the transport cannot be
    ///   built or the server rejects verification.
    pub async fn initialize(&self) -> Result<(), MailDeliveryError> {
        self.ready().await.map(|_| ())
    }

    async fn cached(&self) -> Option<ReadyTransport> {
        match &*self.state.read().await {
            TransporterState::Initialized(ready) => Some(ready.clone()),
            TransporterState::Uninitialized | TransporterState::InitializationFailed => None,
        }
    }

    async fn ready(&self) -> Result<ReadyTransport, MailDeliveryError> {
        if let Some(ready) = self.cached().await {
            return Ok(ready);
        }

        let _gate = self.init_gate.lock().await;
        // A concurrent caller may have finished while this one waited.
        if let Some(ready) = self.cached().await {
            return Ok(ready);
        }

        match self.build_verified().await {
            Ok(ready) => {
                *self.state.write().await = TransporterState::Initialized(ready.clone());
                info!("email service initialized");
                Ok(ready)
            }
            Err(err) => {
                *self.state.write().await = TransporterState::InitializationFailed;
                Err(err)
            }
        }
    }

    async fn build_verified(&self) -> Result<ReadyTransport, MailDeliveryError> {
        let settings = MailSettings::from_env_with(self.env.as_ref()).map_err(|err| {
            error!(error = %err, "email configuration is incomplete");
            MailDeliveryError::configuration(err.to_string())
        })?;

        let transport = self.factory.build(&settings).map_err(|err| {
            error!(error = %err, "failed to build email transport");
            MailDeliveryError::initialization(err.to_string())
        })?;

        transport.verify().await.map_err(|err| {
            error!(error = %err, "email server verification failed");
            MailDeliveryError::initialization(err.to_string())
        })?;

        Ok(ReadyTransport {
            transport,
            settings: Arc::new(settings),
        })
    }
}

#[async_trait]
impl ConfirmationMailer for MailTransporter {
    async fn send_confirmation(
        &self,
        name: &str,
        email: &str,
    ) -> Result<MailReceipt, MailDeliveryError> {
        let ready = self.ready().await?;

        let registrant = validate_registration(Some(name), Some(email)).map_err(|violations| {
            let message = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            MailDeliveryError::validation(message)
        })?;

        let content = confirmation_template::render(
            registrant.name.as_ref(),
            registrant.email.as_ref(),
            self.clock.utc(),
        )
        .map_err(|err| {
            error!(error = %err, "confirmation email failed to render");
            MailDeliveryError::send(err.to_string())
        })?;
        let mail = OutgoingMail {
            sender_name: ready.settings.from_name().to_owned(),
            sender_address: ready.settings.user().to_owned(),
            recipient: registrant.email.to_string(),
            subject: content.subject,
            text: content.text,
            html: content.html,
        };

        info!(recipient = %registrant.email, "sending confirmation email");
        let message_id = ready.transport.deliver(&mail).await.map_err(|err| {
            warn!(error = %err, recipient = %registrant.email, "confirmation email failed");
            MailDeliveryError::send(err.to_string())
        })?;
        info!(%message_id, recipient = %registrant.email, "confirmation email sent");

        Ok(MailReceipt {
            message_id,
            recipient: registrant.email,
        })
    }

    async fn test_connection(&self) -> Result<bool, MailDeliveryError> {
        let ready = self.ready().await?;
        match ready.transport.verify().await {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(error = %err, "email connection test failed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[path = "mail_transporter_tests.rs"]
mod tests;
