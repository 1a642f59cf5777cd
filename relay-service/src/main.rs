use relay_service::{config::Config, utils::mask_key, Application};
use secrecy::ExposeSecret;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let masked = |key: &Option<secrecy::Secret<String>>| {
        key.as_ref()
            .map(|k| mask_key(k.expose_secret(), 15, 4))
            .unwrap_or_else(|| "MISSING".to_string())
    };
    tracing::info!(
        server_key = %masked(&config.midtrans.server_key),
        client_key = %masked(&config.midtrans.client_key),
        merchant_id = %config.midtrans.merchant_id,
        environment = config.midtrans.environment(),
        "Starting relay service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
