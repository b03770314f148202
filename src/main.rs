//! AutoStream sales assistant
//!
//! Main application entry point

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use AutoStream::{
    config::Settings,
    handlers::{build_app, AppState},
    services::ServiceFactory,
    state::{SessionStore, SessionStoreManager},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", AutoStream::info());

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::from_settings(&settings).await?;

    // Initialize session storage
    let store = SessionStore::with_policy(settings.sessions.policy());
    let mut store_manager = SessionStoreManager::new(store.clone(), settings.sessions.cleanup_interval());
    store_manager.start_cleanup();

    let state = AppState::new(services, store, settings.server.default_session_id.clone());
    let app = build_app(state, settings.server.static_dir.as_deref());

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    info!("AutoStream assistant listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store_manager.stop_cleanup();
    info!("AutoStream assistant has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
