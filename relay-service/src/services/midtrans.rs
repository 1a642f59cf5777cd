//! Midtrans Snap client.
//!
//! Implements the Snap transaction endpoint. The relay only creates
//! transactions; payment status is driven by the Snap pop-up on the client.

use crate::config::MidtransCredentials;
use crate::dtos::CreatePaymentRequest;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

pub const DEFAULT_ITEM_NAME: &str = "Pembayaran SPP";
pub const DEFAULT_CUSTOMER_NAME: &str = "Student";

#[derive(Clone)]
pub struct SnapClient {
    client: Client,
    base_url: String,
}

/// Request body for `POST /snap/v1/transactions`.
#[derive(Debug, Serialize)]
pub struct SnapTransactionRequest {
    pub transaction_details: TransactionDetails,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item_details: Vec<ItemDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
    /// Restricts the Snap UI to these payment channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_payments: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Serialize)]
pub struct ItemDetails {
    pub id: String,
    pub price: i64,
    pub quantity: u32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerDetails {
    pub first_name: String,
}

/// Successful Snap response.
#[derive(Debug, Deserialize)]
pub struct SnapTransaction {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub redirect_url: String,
}

/// Snap error body, e.g. `{"error_messages": ["..."]}`.
#[derive(Debug, Deserialize)]
struct SnapErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        /// Parsed provider body, or the bare status code if it was not JSON.
        details: serde_json::Value,
    },

    #[error("Midtrans returned a transaction without a token")]
    EmptyToken,

    #[error("Failed to reach Midtrans: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        let details = match err {
            GatewayError::Api { details, .. } => Some(details),
            GatewayError::Transport(e) => e.status().map(|s| serde_json::json!(s.as_u16())),
            GatewayError::EmptyToken => None,
        };
        AppError::GatewayError { message, details }
    }
}

impl From<&CreatePaymentRequest> for SnapTransactionRequest {
    fn from(payload: &CreatePaymentRequest) -> Self {
        let item_name = non_blank(payload.bill_title.as_deref()).unwrap_or(DEFAULT_ITEM_NAME);
        let first_name = non_blank(payload.name.as_deref()).unwrap_or(DEFAULT_CUSTOMER_NAME);

        Self {
            transaction_details: TransactionDetails {
                order_id: payload.order_id.clone(),
                gross_amount: payload.amount,
            },
            item_details: vec![ItemDetails {
                id: payload.order_id.clone(),
                price: payload.amount,
                quantity: 1,
                name: item_name.to_string(),
            }],
            customer_details: Some(CustomerDetails {
                first_name: first_name.to_string(),
            }),
            enabled_payments: non_blank(payload.payment_method.as_deref())
                .map(|method| vec![method.to_string()]),
        }
    }
}

impl SnapTransactionRequest {
    /// Bare transaction used to check that the server key is accepted.
    pub fn probe(order_id: String, gross_amount: i64) -> Self {
        Self {
            transaction_details: TransactionDetails {
                order_id,
                gross_amount,
            },
            item_details: Vec::new(),
            customer_details: None,
            enabled_payments: None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl SnapClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a Snap transaction and return its token and redirect URL.
    pub async fn create_transaction(
        &self,
        credentials: &MidtransCredentials,
        request: &SnapTransactionRequest,
    ) -> Result<SnapTransaction, GatewayError> {
        let url = format!("{}/snap/v1/transactions", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(credentials.server_key.expose_secret(), None::<&str>)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "Midtrans create_transaction response");

        if status.is_success() {
            let transaction: SnapTransaction = serde_json::from_str(&body).map_err(|e| {
                tracing::error!(error = %e, "Malformed Midtrans transaction response");
                GatewayError::Api {
                    status,
                    message: format!("Malformed Midtrans response: {}", e),
                    details: serde_json::Value::String(body.clone()),
                }
            })?;

            if transaction.token.is_empty() {
                return Err(GatewayError::EmptyToken);
            }

            tracing::info!(
                order_id = %request.transaction_details.order_id,
                gross_amount = request.transaction_details.gross_amount,
                "Midtrans transaction created"
            );
            Ok(transaction)
        } else {
            let error = api_error(status, &body);
            if let GatewayError::Api { message, .. } = &error {
                tracing::error!(
                    status = %status,
                    message = %message,
                    "Midtrans transaction creation failed"
                );
            }
            Err(error)
        }
    }
}

fn api_error(status: StatusCode, body: &str) -> GatewayError {
    let fallback = format!(
        "Midtrans API is returning API error. HTTP status code: {}",
        status.as_u16()
    );

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(details) => {
            let messages = serde_json::from_value::<SnapErrorBody>(details.clone())
                .map(|b| b.error_messages)
                .unwrap_or_default();
            let message = if messages.is_empty() {
                fallback
            } else {
                messages.join("; ")
            };
            GatewayError::Api {
                status,
                message,
                details,
            }
        }
        Err(_) => GatewayError::Api {
            status,
            message: if body.trim().is_empty() {
                fallback
            } else {
                body.to_string()
            },
            details: serde_json::json!(status.as_u16()),
        },
    }
}
