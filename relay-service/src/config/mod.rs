use anyhow::Result;
use dotenvy::dotenv;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::error::AppError;
use std::env;

pub const SANDBOX_SNAP_BASE_URL: &str = "https://app.sandbox.midtrans.com";
pub const PRODUCTION_SNAP_BASE_URL: &str = "https://app.midtrans.com";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub midtrans: MidtransConfig,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Gateway settings. The keys are optional here: a relay without keys still
/// starts, and every payment request reports the missing configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct MidtransConfig {
    pub server_key: Option<Secret<String>>,
    pub client_key: Option<Secret<String>>,
    pub is_production: bool,
    pub merchant_id: String,
    /// Overrides the sandbox/production Snap host (local mocks, proxies).
    pub snap_base_url: Option<String>,
}

/// Keys that have been checked to be present.
#[derive(Clone, Debug)]
pub struct MidtransCredentials {
    pub server_key: Secret<String>,
    pub client_key: Secret<String>,
}

impl MidtransConfig {
    pub fn credentials(&self) -> Result<MidtransCredentials, AppError> {
        match (present(&self.server_key), present(&self.client_key)) {
            (Some(server_key), Some(client_key)) => Ok(MidtransCredentials {
                server_key: server_key.clone(),
                client_key: client_key.clone(),
            }),
            (server, client) => Err(AppError::ConfigError(anyhow::anyhow!(
                "Midtrans keys missing in environment variables (server key: {}, client key: {})",
                if server.is_some() { "set" } else { "missing" },
                if client.is_some() { "set" } else { "missing" },
            ))),
        }
    }

    pub fn snap_base_url(&self) -> String {
        match &self.snap_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.is_production => PRODUCTION_SNAP_BASE_URL.to_string(),
            None => SANDBOX_SNAP_BASE_URL.to_string(),
        }
    }

    pub fn environment(&self) -> &'static str {
        if self.is_production {
            "production"
        } else {
            "sandbox"
        }
    }
}

fn present(key: &Option<Secret<String>>) -> Option<&Secret<String>> {
    key.as_ref()
        .filter(|secret| !secret.expose_secret().trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("RELAY_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("RELAY_SERVICE_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()?;

        let server_key = env::var("MIDTRANS_SERVER_KEY").ok().map(Secret::new);
        let client_key = env::var("MIDTRANS_CLIENT_KEY").ok().map(Secret::new);
        let is_production = env::var("MIDTRANS_IS_PRODUCTION")
            .map(|v| v == "true")
            .unwrap_or(false);
        let merchant_id = env::var("MIDTRANS_MERCHANT_ID").unwrap_or_default();
        let snap_base_url = env::var("MIDTRANS_SNAP_BASE_URL")
            .ok()
            .filter(|v| !v.is_empty());

        let log_level =
            env::var("RUST_LOG").unwrap_or_else(|_| "info,relay_service=debug".to_string());
        let otlp_endpoint = env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty());

        Ok(Self {
            server: ServerConfig { host, port },
            midtrans: MidtransConfig {
                server_key,
                client_key,
                is_production,
                merchant_id,
                snap_base_url,
            },
            service_name: "relay-service".to_string(),
            log_level,
            otlp_endpoint,
        })
    }
}
