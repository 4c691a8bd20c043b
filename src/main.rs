use diabetes_api::{config, model, observability, server};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Init
    observability::init_tracing();
    let metrics_handle = observability::install_metrics_recorder()?;

    // 2. Load Config
    let config = config::AppConfig::from_env()?;

    // 3. Load the model once; a missing or corrupt artifact leaves it absent
    info!("Loading model from {}", config.model.path);
    let handle = model::ModelHandle::new(model::loader::load_or_degrade(&config.model.path));

    // 4. Drain the Prometheus histograms periodically
    let upkeep = metrics_handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    // 5. Create Router
    let app = server::routes::create_router(
        handle,
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    // 6. Bind & Serve
    server::serve(&config.bind_addr(), app).await
}
