//! HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use stars_payments::RequesterId;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Telegram Stars Payment Backend";

const MISSING_USER_ID: &str = "Необходим userId";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub user_id: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub success: bool,
    pub invoice_link: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Create a Telegram Stars invoice link for the requester
pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentResponse>, ApiError> {
    let request = payload.unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable create-payment body");
        Json(CreatePaymentRequest::default())
    });

    let requester = RequesterId::from_value(request.0.user_id)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, MISSING_USER_ID))?;

    let product_title = state.checkout.product().title.clone();
    let invoice_link = state
        .checkout
        .create_invoice_link(requester, &product_title)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Payment creation failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
        })?;

    Ok(Json(CreatePaymentResponse {
        success: true,
        invoice_link,
    }))
}
