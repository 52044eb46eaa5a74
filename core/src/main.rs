use aggregator_core::bootstrap;
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = bootstrap::bootstrap().await?;
    info!(
        "Aggregator ready: operator={} chain={} listen={} metrics={}",
        config.identity().address(),
        config.identity().chain_id(),
        config.server_address(),
        if config.enable_metrics() {
            config.metrics_address()
        } else {
            "disabled"
        }
    );
    Ok(())
}
