//! JSON envelopes shared by every endpoint.
//!
//! Successful responses are `{success: true, message, data, timestamp}`;
//! failures are `{success: false, code, message, errors, traceId?, timestamp}`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Successful response wrapper.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessEnvelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> SuccessEnvelope<T> {
    /// Wrap `data` with the current time.
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Failure response wrapper.
///
/// `errors` is always present so clients can iterate it unconditionally.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    pub code: ErrorCode,
    #[schema(example = "Validation failed")]
    pub message: String,
    #[schema(example = json!(["Email must be a valid email address"]))]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            success: false,
            code: error.code(),
            message: error.message().to_owned(),
            errors: error.errors().to_vec(),
            trace_id: error.trace_id().map(str::to_owned),
            timestamp: Utc::now(),
        }
    }
}
