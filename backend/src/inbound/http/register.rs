//! Registration endpoint.
//!
//! ```text
//! POST /api/register {"name":"Ada","email":"ada@example.com"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{RegistrationOutcome, RegistrationRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ErrorEnvelope, SuccessEnvelope};
use crate::inbound::http::state::HttpState;

const EMAIL_SENT_MESSAGE: &str = "User registered successfully and confirmation email sent!";
const EMAIL_FAILED_MESSAGE: &str =
    "User registered successfully, but email sending failed. Please check the email configuration.";

/// Registration result returned in the `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    #[schema(example = 42)]
    pub user_id: i64,
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub email_sent: bool,
    /// `null` when the confirmation email was delivered.
    pub email_error: Option<String>,
}

impl From<RegistrationOutcome> for RegistrationData {
    fn from(outcome: RegistrationOutcome) -> Self {
        Self {
            user_id: outcome.user_id.get(),
            name: outcome.name.into(),
            email: outcome.email.into(),
            email_sent: outcome.email_sent,
            email_error: outcome.email_error,
        }
    }
}

/// Register a user and send the confirmation email.
///
/// A failed email still returns 201; inspect `emailSent` and `emailError`.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "User registered", body = SuccessEnvelope<RegistrationData>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 409, description = "Email already registered", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["registration"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let outcome = state.registration.register(payload.into_inner()).await?;
    let message = if outcome.email_sent {
        EMAIL_SENT_MESSAGE
    } else {
        EMAIL_FAILED_MESSAGE
    };
    Ok(HttpResponse::Created().json(SuccessEnvelope::new(
        message,
        RegistrationData::from(outcome),
    )))
}
