//! Outbound SMTP adapter for confirmation mail.
//!
//! The domain [`crate::domain::MailTransporter`] owns the lifecycle; this
//! module only builds lettre clients and turns rendered mail into MIME
//! messages.

mod lettre_transport;

pub use lettre_transport::{LettreMailTransport, LettreTransportFactory};
