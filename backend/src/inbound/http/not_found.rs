//! Fallback for unmatched routes.

use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::debug;

/// Body returned for unknown paths.
#[derive(Debug, Serialize)]
struct NotFoundBody<'a> {
    success: bool,
    message: &'static str,
    path: &'a str,
}

/// Default service: 404 with the requested path echoed back.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!(path = req.path(), method = %req.method(), "no route matched");
    HttpResponse::NotFound().json(NotFoundBody {
        success: false,
        message: "API endpoint not found",
        path: req.path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("/api/unknown")]
    #[case("/")]
    #[actix_web::test]
    async fn echoes_unmatched_path(#[case] path: &str) {
        let app =
            actix_test::init_service(App::new().default_service(web::to(not_found))).await;
        let req = actix_test::TestRequest::get().uri(path).to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"success": false, "message": "API endpoint not found", "path": path})
        );
    }
}
