use anyhow::Context;
use blockchain::RpcConnector;
use env_logger::Env;
use log::info;

use crate::{
    config::{AppConfig, ConfigRaw},
    runtime::AggregatorConfig,
};

fn load_config() -> anyhow::Result<AppConfig> {
    dotenv::dotenv()
        .map_err(|err| {
            eprintln!(".env file error: {err}");
            err
        })
        .ok();

    AppConfig::fetch()
}

/// Loads inputs, initialises logging and assembles the runtime
/// configuration. Any error is fatal to the process.
pub async fn bootstrap() -> anyhow::Result<AggregatorConfig> {
    let app_config = load_config()?;
    let raw = ConfigRaw::load(&app_config.launch.config_file)?;

    env_logger::Builder::from_env(Env::default().default_filter_or(raw.environment.log_level().as_str()))
        .init();
    info!(
        "Bootstrapping aggregator from {}",
        app_config.launch.config_file.display()
    );

    let config = AggregatorConfig::assemble(
        raw,
        &app_config.launch,
        &app_config.secrets,
        &RpcConnector,
    )
    .await
    .context("Aggregator configuration rejected")?;

    Ok(config)
}
