//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ConfirmationMailer, RegistrationCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub mailer: Arc<dyn ConfirmationMailer>,
}

impl HttpState {
    /// Bundle the ports used by the HTTP adapter.
    pub fn new(
        registration: Arc<dyn RegistrationCommand>,
        users: Arc<dyn UsersQuery>,
        mailer: Arc<dyn ConfirmationMailer>,
    ) -> Self {
        Self {
            registration,
            users,
            mailer,
        }
    }
}
