//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the envelope and payload schemas. Swagger UI serves it in debug
//! builds.

use utoipa::OpenApi;

use crate::domain::ports::RegistrationRequest;
use crate::domain::{ErrorCode, User};
use crate::inbound::http::envelope::ErrorEnvelope;
use crate::inbound::http::health::{HealthResponse, MailHealth, MailHealthResponse};
use crate::inbound::http::register::RegistrationData;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Email confirmation API",
        description = "User registration with confirmation emails, listing and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::register::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::health::health,
        crate::inbound::http::health::mail_health,
    ),
    components(schemas(
        RegistrationRequest,
        RegistrationData,
        User,
        ErrorEnvelope,
        ErrorCode,
        HealthResponse,
        MailHealth,
        MailHealthResponse
    )),
    tags(
        (name = "registration", description = "User registration"),
        (name = "users", description = "Registered users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
