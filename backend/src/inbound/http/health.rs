//! Health endpoints: API liveness and mail server reachability.

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;

/// Version reported by the liveness endpoint.
pub const API_VERSION: &str = "1.0.0";
const HEALTH_MESSAGE: &str = "Email Confirmation System API is running";
const MAIL_REACHABLE_MESSAGE: &str = "Email service connection test successful";
const MAIL_UNREACHABLE_MESSAGE: &str = "Email service connection test failed";

/// Liveness payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    #[schema(example = "Email Confirmation System API is running")]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[schema(example = "1.0.0")]
    pub version: String,
}

/// Mail reachability flag.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct MailHealth {
    pub reachable: bool,
}

/// Mail connectivity payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MailHealthResponse {
    pub success: bool,
    pub message: String,
    pub data: MailHealth,
    pub timestamp: DateTime<Utc>,
}

/// Report that the API process is serving requests.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "API is running", body = HealthResponse)),
    tags = ["health"],
    operation_id = "health"
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(HealthResponse {
            success: true,
            message: HEALTH_MESSAGE.to_owned(),
            timestamp: Utc::now(),
            version: API_VERSION.to_owned(),
        })
}

/// Verify the SMTP connection without touching user data.
///
/// Initialises the mail transporter if needed. Returns 503 when the server is
/// unreachable or mail is not configured.
#[utoipa::path(
    get,
    path = "/api/health/mail",
    responses(
        (status = 200, description = "Mail server reachable", body = MailHealthResponse),
        (status = 503, description = "Mail server unreachable or not configured", body = MailHealthResponse)
    ),
    tags = ["health"],
    operation_id = "mailHealth"
)]
#[get("/health/mail")]
pub async fn mail_health(state: web::Data<HttpState>) -> HttpResponse {
    let (reachable, message) = match state.mailer.test_connection().await {
        Ok(true) => (true, MAIL_REACHABLE_MESSAGE.to_owned()),
        Ok(false) => (false, MAIL_UNREACHABLE_MESSAGE.to_owned()),
        Err(err) => {
            warn!(error = %err, "mail health check could not initialise transport");
            (false, err.client_message())
        }
    };

    let mut response = if reachable {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(MailHealthResponse {
            success: reachable,
            message,
            data: MailHealth { reachable },
            timestamp: Utc::now(),
        })
}
