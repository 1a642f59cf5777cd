use relay_service::config::{Config, MidtransConfig, ServerConfig};
use relay_service::Application;
use secrecy::Secret;

pub const TEST_SERVER_KEY: &str = "SB-Mid-server-TEST123";
pub const TEST_CLIENT_KEY: &str = "SB-Mid-client-TEST123";
/// `Basic base64("SB-Mid-server-TEST123:")`
pub const TEST_BASIC_AUTH: &str = "Basic U0ItTWlkLXNlcnZlci1URVNUMTIzOg==";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config(snap_base_url: Option<String>, with_keys: bool) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        midtrans: MidtransConfig {
            server_key: with_keys.then(|| Secret::new(TEST_SERVER_KEY.to_string())),
            client_key: with_keys.then(|| Secret::new(TEST_CLIENT_KEY.to_string())),
            is_production: false,
            merchant_id: "G000000000".to_string(),
            snap_base_url,
        },
        service_name: "relay-service".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
    }
}

impl TestApp {
    /// Spawn a relay pointed at `snap_base_url` (usually a wiremock server).
    pub async fn spawn(snap_base_url: Option<String>) -> Self {
        Self::spawn_with(test_config(snap_base_url, true)).await
    }

    /// Spawn a relay with no Midtrans keys configured.
    pub async fn spawn_without_keys(snap_base_url: Option<String>) -> Self {
        Self::spawn_with(test_config(snap_base_url, false)).await
    }

    pub async fn spawn_with(config: Config) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/api/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn create_payment(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/payment/create", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn create_payment_raw(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.client
            .post(format!("{}/api/payment/create", self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
