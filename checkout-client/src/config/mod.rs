use secrecy::Secret;
use serde::Deserialize;
use service_core::error::AppError;
use std::time::Duration;

pub const SANDBOX_SNAP_SCRIPT_URL: &str = "https://app.sandbox.midtrans.com/snap/snap.js";
pub const PRODUCTION_SNAP_SCRIPT_URL: &str = "https://app.midtrans.com/snap/snap.js";

#[derive(Deserialize, Clone, Debug)]
pub struct CheckoutConfig {
    #[serde(default = "default_relay_base_url")]
    pub relay_base_url: String,
    /// Public Snap client key, attached to the script tag.
    #[serde(default)]
    pub client_key: String,
    #[serde(default)]
    pub is_production: bool,
    #[serde(default = "default_success_redirect_delay_ms")]
    pub success_redirect_delay_ms: u64,
    #[serde(default)]
    pub admin: AdminAccount,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AdminAccount {
    pub username: String,
    pub password: Secret<String>,
    #[serde(default = "default_admin_name")]
    pub name: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: Secret::new("admin123".to_string()),
            name: default_admin_name(),
        }
    }
}

fn default_relay_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_success_redirect_delay_ms() -> u64 {
    2000
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl CheckoutConfig {
    /// `CHECKOUT__RELAY_BASE_URL`, `CHECKOUT__ADMIN__USERNAME`, ...
    pub fn load() -> Result<Self, AppError> {
        service_core::config::load_layered("CHECKOUT")
    }

    pub fn snap_script_url(&self) -> &'static str {
        if self.is_production {
            PRODUCTION_SNAP_SCRIPT_URL
        } else {
            SANDBOX_SNAP_SCRIPT_URL
        }
    }

    pub fn success_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.success_redirect_delay_ms)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            relay_base_url: default_relay_base_url(),
            client_key: String::new(),
            is_production: false,
            success_redirect_delay_ms: default_success_redirect_delay_ms(),
            admin: AdminAccount::default(),
        }
    }
}
