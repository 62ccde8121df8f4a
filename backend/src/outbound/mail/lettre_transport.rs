//! SMTP transport built on lettre.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

use crate::domain::mail_config::{MailProvider, MailSettings};
use crate::domain::ports::{MailTransport, MailTransportError, MailTransportFactory, OutgoingMail};

const GMAIL_RELAY: &str = "smtp.gmail.com";

/// Builds lettre SMTP transports from [`MailSettings`].
///
/// Gmail uses its implicit-TLS relay. Generic SMTP uses implicit TLS when
/// `secure` is set and STARTTLS otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct LettreTransportFactory;

impl MailTransportFactory for LettreTransportFactory {
    fn build(&self, settings: &MailSettings) -> Result<Arc<dyn MailTransport>, MailTransportError> {
        let builder = match settings.provider() {
            MailProvider::Gmail => AsyncSmtpTransport::<Tokio1Executor>::relay(GMAIL_RELAY),
            MailProvider::Smtp {
                host,
                port,
                secure: true,
            } => AsyncSmtpTransport::<Tokio1Executor>::relay(host).map(|b| b.port(*port)),
            MailProvider::Smtp {
                host,
                port,
                secure: false,
            } => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).map(|b| b.port(*port)),
        }
        .map_err(|err| MailTransportError::build(err.to_string()))?;

        let transport = builder
            .credentials(Credentials::new(
                settings.user().to_owned(),
                settings.password().to_owned(),
            ))
            .build();

        Ok(Arc::new(LettreMailTransport { transport }))
    }
}

/// lettre-backed [`MailTransport`].
#[derive(Clone)]
pub struct LettreMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait]
impl MailTransport for LettreMailTransport {
    async fn verify(&self) -> Result<(), MailTransportError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailTransportError::verify(
                "server did not accept the connection",
            )),
            Err(err) => Err(MailTransportError::verify(err.to_string())),
        }
    }

    async fn deliver(&self, mail: &OutgoingMail) -> Result<String, MailTransportError> {
        let (message, message_id) = build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| MailTransportError::delivery(err.to_string()))?;
        Ok(message_id)
    }
}

/// Assemble a multipart text/HTML message and its `Message-ID`.
fn build_message(mail: &OutgoingMail) -> Result<(Message, String), MailTransportError> {
    let sender: Address = mail.sender_address.parse().map_err(|_| {
        MailTransportError::message(format!("invalid sender address: {}", mail.sender_address))
    })?;
    let recipient: Address = mail.recipient.parse().map_err(|_| {
        MailTransportError::message(format!("invalid recipient address: {}", mail.recipient))
    })?;
    let message_id = format!("<{}@{}>", Uuid::new_v4(), sender.domain());

    let message = Message::builder()
        .from(Mailbox::new(Some(mail.sender_name.clone()), sender))
        .to(Mailbox::new(None, recipient))
        .subject(mail.subject.as_str())
        .message_id(Some(message_id.clone()))
        .multipart(MultiPart::alternative_plain_html(
            mail.text.clone(),
            mail.html.clone(),
        ))
        .map_err(|err| MailTransportError::message(err.to_string()))?;

    Ok((message, message_id))
}
