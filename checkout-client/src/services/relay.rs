//! Client side of `POST /api/payment/create`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::CheckoutFailure;
use crate::models::{GatewaySession, PaymentIntent};

#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Exchange a payment intent for a Snap session. One call, no retry.
    async fn create_payment(&self, intent: &PaymentIntent) -> Result<GatewaySession, CheckoutFailure>;
}

/// Relay client over HTTP.
#[derive(Clone)]
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    error: Option<String>,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn create_payment(&self, intent: &PaymentIntent) -> Result<GatewaySession, CheckoutFailure> {
        let url = format!("{}/api/payment/create", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(intent)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(order_id = %intent.order_id, error = %e, "Relay unreachable");
                CheckoutFailure::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<RelayErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Failed to create transaction".to_string());
            tracing::warn!(
                order_id = %intent.order_id,
                status = %status,
                message = %message,
                "Relay rejected payment"
            );
            return Err(CheckoutFailure::Gateway(message));
        }

        let session: GatewaySession = response.json().await.map_err(|e| {
            CheckoutFailure::Gateway(format!("Unreadable relay response: {}", e))
        })?;

        if session.token.is_empty() {
            return Err(CheckoutFailure::Gateway(
                "Relay returned an empty token".to_string(),
            ));
        }

        tracing::debug!(order_id = %intent.order_id, "Snap session received");
        Ok(session)
    }
}
