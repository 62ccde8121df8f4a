//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod confirmation_mailer;
mod mail_transport;
mod registration_command;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use confirmation_mailer::MockConfirmationMailer;
pub use confirmation_mailer::{ConfirmationMailer, MailDeliveryError, MailReceipt};
#[cfg(test)]
pub use mail_transport::{MockMailTransport, MockMailTransportFactory};
pub use mail_transport::{MailTransport, MailTransportError, MailTransportFactory, OutgoingMail};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::{RegistrationCommand, RegistrationOutcome, RegistrationRequest};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
