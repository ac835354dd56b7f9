use anyhow::Result;
use ledgerly_backend_lib::{config::Settings, router, storage::FlatFileStorage, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize configuration, falling back through the known locations
    let settings = Settings::load()
        .or_else(|_| Settings::load_from("config/default.toml"))
        .unwrap_or_default();

    // Initialize tracing from RUST_LOG or the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    // Create storage
    let storage = FlatFileStorage::new(&settings.data_dir)?;

    // Create application state
    let addr = settings.bind_addr;
    let state = Arc::new(AppState::new(storage, settings));

    // Create the router and start the server
    let app = router::create_router(state);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
