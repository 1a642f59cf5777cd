//! Snap transaction relay handlers.

use axum::{
    body::to_bytes,
    extract::{Request, State},
    Json,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{CreatePaymentRequest, CreatePaymentResponse, TestKeyResponse},
    services::{record_transaction, SnapTransactionRequest},
    startup::AppState,
    utils::mask_key,
};

const TEST_KEY_AMOUNT: i64 = 10_000;
/// Same ceiling as axum's default body limit.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Create a Snap transaction for the given payment intent.
///
/// Credentials are checked before the body is read, so a relay without keys
/// answers every request with the same configuration error, oversized bodies
/// included.
pub async fn create_payment(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<CreatePaymentResponse>, AppError> {
    let credentials = state.config.midtrans.credentials().map_err(|e| {
        tracing::error!(error = %e, "Refusing payment request");
        record_transaction("config_error");
        e
    })?;

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            record_transaction("invalid_request");
            AppError::BadRequest(anyhow::anyhow!("Failed to read payment request body: {}", e))
        })?;

    let payload: CreatePaymentRequest = serde_json::from_slice(&body).map_err(|e| {
        record_transaction("invalid_request");
        AppError::BadRequest(anyhow::anyhow!("Invalid payment request body: {}", e))
    })?;
    payload.validate().inspect_err(|_| record_transaction("invalid_request"))?;

    tracing::info!(
        order_id = %payload.order_id,
        amount = payload.amount,
        payment_method = ?payload.payment_method,
        "Creating Snap transaction"
    );

    let request = SnapTransactionRequest::from(&payload);
    let transaction = state
        .snap
        .create_transaction(&credentials, &request)
        .await
        .map_err(|e| {
            tracing::error!(order_id = %payload.order_id, error = %e, "Midtrans error");
            record_transaction("gateway_error");
            AppError::from(e)
        })?;

    record_transaction("created");

    Ok(Json(CreatePaymentResponse {
        token: transaction.token,
        redirect_url: transaction.redirect_url,
    }))
}

/// Check that the configured server key is accepted by creating a throwaway
/// transaction.
pub async fn test_key(State(state): State<AppState>) -> Json<TestKeyResponse> {
    let credentials = match state.config.midtrans.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            return Json(TestKeyResponse {
                status: "FAILED",
                message: e.to_string(),
                token: None,
                server_key_used: Some("NONE".to_string()),
            })
        }
    };

    let order_id = format!("TEST-{}", chrono::Utc::now().timestamp_millis());
    let request = SnapTransactionRequest::probe(order_id, TEST_KEY_AMOUNT);

    match state.snap.create_transaction(&credentials, &request).await {
        Ok(transaction) => Json(TestKeyResponse {
            status: "SUCCESS",
            message: "API key is valid!".to_string(),
            token: Some(transaction.token),
            server_key_used: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Midtrans key check failed");
            Json(TestKeyResponse {
                status: "FAILED",
                message: e.to_string(),
                token: None,
                server_key_used: Some(mask_key(credentials.server_key.expose_secret(), 20, 0)),
            })
        }
    }
}
