use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/payment/create`, as sent by the checkout client.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Caller-generated, one per attempt. Midtrans caps order ids at 50 chars.
    #[validate(length(min = 1, max = 50, message = "orderId must be 1-50 characters"))]
    pub order_id: String,
    /// Smallest currency unit (whole rupiah).
    #[validate(range(min = 1, message = "amount must be a positive integer"))]
    pub amount: i64,
    pub name: Option<String>,
    pub bill_title: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub token: String,
    pub redirect_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestKeyResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_key_used: Option<String>,
}
