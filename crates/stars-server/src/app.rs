//! Router Assembly

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{create_payment, health_check};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    // Any origin: FRONTEND_URL is informational only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/create-payment", post(create_payment))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use stars_payments::{InvoicePayload, MockPlatform, RequesterId};
    use tower::ServiceExt;

    use super::*;

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/create-payment")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn read_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_payment_returns_link() {
        let platform = Arc::new(MockPlatform::with_link("https://t.me/invoice/abc123"));
        let app = router(AppState::new(platform.clone()));

        let resp = app.oneshot(post_json(r#"{"userId": 42}"#)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            read_json(resp).await,
            json!({"success": true, "invoiceLink": "https://t.me/invoice/abc123"})
        );

        let invoices = platform.invoices().await;
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].currency, "XTR");
        assert_eq!(invoices[0].prices.len(), 1);
        assert_eq!(invoices[0].prices[0].amount, 1);
        assert_eq!(invoices[0].title, "Цифровой товар за 1 звезду");

        let payload: InvoicePayload = serde_json::from_str(&invoices[0].payload).unwrap();
        assert_eq!(payload.user_id, RequesterId::from(42));
        assert_eq!(payload.product, "digital_item_1");
        assert!(payload.timestamp > 0);
    }

    #[tokio::test]
    async fn test_string_user_id_accepted() {
        let platform = Arc::new(MockPlatform::new());
        let app = router(AppState::new(platform.clone()));

        let resp = app.oneshot(post_json(r#"{"userId": "tg-777"}"#)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert!(!body["invoiceLink"].as_str().unwrap().is_empty());
        assert!(platform.invoices().await[0].payload.contains(r#""userId":"tg-777""#));
    }

    #[tokio::test]
    async fn test_missing_user_id_is_bad_request() {
        let bodies = [
            "{}",
            r#"{"userId": null}"#,
            r#"{"userId": ""}"#,
            r#"{"userId": 0}"#,
            r#"{"user_id": 42}"#,
            "not json",
        ];
        let platform = Arc::new(MockPlatform::new());
        let app = router(AppState::new(platform.clone()));

        for body in bodies {
            let resp = app.clone().oneshot(post_json(body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(read_json(resp).await, json!({"error": "Необходим userId"}));
        }

        assert!(platform.invoices().await.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic_500() {
        let upstream = "Unauthorized: secret token 123:abc rejected";
        let platform = Arc::new(MockPlatform::failing_invoices(upstream));
        let app = router(AppState::new(platform));

        let resp = app.oneshot(post_json(r#"{"userId": 42}"#)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("Unauthorized"));
        assert!(!text.contains("123:abc"));
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"error": "Ошибка при создании платежа"})
        );
    }

    #[tokio::test]
    async fn test_health_is_ok_after_failures() {
        let platform = Arc::new(MockPlatform::failing_invoices("boom"));
        let app = router(AppState::new(platform));

        let failed = app.clone().oneshot(post_json(r#"{"userId": 1}"#)).await.unwrap();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "Telegram Stars Payment Backend");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = router(AppState::new(Arc::new(MockPlatform::new())));

        let resp = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
