use anyhow::Context;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use salesboard::api::build_router;
use salesboard::models::{AppConfig, AppState};
use salesboard::services::{load_dataset, CommandConverter, VectorConverter};
use salesboard::utils::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("cannot create work dir {}", config.work_dir.display()))?;

    let dataset = load_dataset(&config.dataset_path)
        .with_context(|| format!("cannot load dataset {}", config.dataset_path.display()))?;

    let converter = CommandConverter::new(config.converter_bin.clone());
    if converter.is_available() {
        info!("EMF charts enabled via {}", converter.program());
    } else {
        info!("{} not found, charts will be embedded as PNG", converter.program());
    }

    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::new(dataset, config, Arc::new(converter)));
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", bind_addr))?;
    info!("🚀 Sales dashboard running on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
