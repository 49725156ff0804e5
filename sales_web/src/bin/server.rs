use anyhow::Context;
use sales_web::{config::AppConfig, logging::init_logging, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_from_env().context("failed to load configuration")?;
    init_logging(&config.log)?;

    tracing::info!(
        data = %config.data.path.display(),
        model = %config.forecast.model,
        "Sales forecaster starting"
    );

    run_server(config).await
}
