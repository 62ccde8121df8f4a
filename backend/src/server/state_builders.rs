//! Wiring of adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use registration::domain::mail_config::DefaultMailEnv;
use registration::domain::{MailTransporter, RegistrationService};
use registration::inbound::http::state::HttpState;
use registration::outbound::mail::LettreTransportFactory;
use registration::outbound::persistence::{DbPool, DieselUserRepository};

/// Build the shared handler state over a database pool.
///
/// One [`MailTransporter`] serves both registration and the mail health
/// check so initialisation happens at most once per process.
pub fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    let users = Arc::new(DieselUserRepository::new(
        pool.clone(),
        Arc::new(DefaultClock),
    ));
    let mailer = Arc::new(MailTransporter::new(
        Arc::new(DefaultMailEnv),
        Arc::new(LettreTransportFactory),
        Arc::new(DefaultClock),
    ));
    let service = Arc::new(RegistrationService::new(users, mailer.clone()));
    web::Data::new(HttpState::new(service.clone(), service, mailer))
}
