//! Users listing endpoint.
//!
//! ```text
//! GET /api/users
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ErrorEnvelope, SuccessEnvelope};
use crate::inbound::http::state::HttpState;

/// List registered users, newest first.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Registered users", body = SuccessEnvelope<Vec<User>>),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users.list_users().await?;
    let message = format!("Retrieved {} users", users.len());
    Ok(HttpResponse::Ok().json(SuccessEnvelope::new(message, users)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{MockConfirmationMailer, MockRegistrationCommand, MockUsersQuery};
    use crate::domain::{EmailAddress, Error, UserId, UserName};

    async fn get_users(query: MockUsersQuery) -> (StatusCode, Value) {
        let state = HttpState::new(
            Arc::new(MockRegistrationCommand::new()),
            Arc::new(query),
            Arc::new(MockConfirmationMailer::new()),
        );
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(list_users)),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/api/users").to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn lists_users_in_envelope() {
        let mut query = MockUsersQuery::new();
        query.expect_list_users().times(1).return_once(|| {
            let created = Utc
                .with_ymd_and_hms(2025, 2, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp");
            Ok(vec![User::new(
                UserId::new(3),
                UserName::new("Ada").expect("valid name"),
                EmailAddress::new("ada@example.com").expect("valid email"),
                created,
                Some(created),
            )])
        });

        let (status, body) = get_users(query).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["message"], "Retrieved 1 users");
        assert_eq!(body["data"][0]["id"], 3);
        assert_eq!(body["data"][0]["emailSent"], Value::Bool(true));
    }

    #[rstest]
    #[actix_web::test]
    async fn storage_failure_is_internal_error() {
        let mut query = MockUsersQuery::new();
        query
            .expect_list_users()
            .times(1)
            .return_once(|| Err(Error::internal("failed to list users: refused")));

        let (status, body) = get_users(query).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
