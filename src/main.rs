use alert_ledger::{
    config::settings::load_app_settings,
    core::{ingest::IngestHandler, storage},
    errors::Result,
    metrics::Metrics,
    server::{self, AppState},
};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Load settings
    let settings = load_app_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Open the storage backend; an unreachable database or an unsupported
    //    model is fatal
    let metrics = Arc::new(Metrics::new()?);
    let store = storage::open(&settings, &metrics)
        .await
        .inspect(|_| info!("Storage backend ready"))
        .inspect_err(|e| error!("Failed to open storage backend: {}", e))?;

    // 5. Serve until interrupted
    let listener = TcpListener::bind(&settings.listen_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", settings.listen_address, e))?;
    let state = AppState::new(
        IngestHandler::new(Arc::clone(&store), settings.debug),
        metrics,
        settings.request_timeout(),
    );
    let served = server::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    })
    .await;

    // 6. Release the store whether or not serving failed
    if let Err(e) = store.close().await {
        warn!("Failed to close storage backend: {}", e);
    }
    served
}
