use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use euribor_api::background;
use euribor_api::config::{ConfigError, ServerConfig};
use euribor_api::router::build_app_router;
use euribor_api::state::AppState;
use euribor_cache::{CsvRatesSource, RateCache};
use euribor_db::{MemoryThresholdStore, PgThresholdStore, ThresholdStore};
use euribor_events::{build_notifier, NotifierConfig, NotifierConfigError, NotifyError};

/// Anything that stops the server from starting or running.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Notifier(#[from] NotifierConfigError),

    #[error("Failed to build notifier: {0}")]
    NotifierClient(#[from] NotifyError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid HOST address '{0}'")]
    Host(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "euribor_api=debug,euribor_cache=info,euribor_events=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        history_path = %config.history_path.display(),
        "Loaded server configuration"
    );

    // --- Threshold store ---
    let store: Arc<dyn ThresholdStore> = match &config.database_url {
        Some(url) => {
            let pool = euribor_db::create_pool(url).await?;
            tracing::info!("Database connection pool created");

            euribor_db::health_check(&pool).await?;
            tracing::info!("Database health check passed");

            euribor_db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgThresholdStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, thresholds are kept in memory only");
            Arc::new(MemoryThresholdStore::new())
        }
    };

    // --- Notifier ---
    let notifier = build_notifier(NotifierConfig::from_env()?)?;

    // --- Cache and workers ---
    let cache = Arc::new(RateCache::new());
    let source = Arc::new(CsvRatesSource::new(config.history_path.clone()));
    let workers = background::start(
        source,
        Arc::clone(&cache),
        Arc::clone(&store),
        notifier,
        config.refresh_poll_interval(),
    );

    // --- Router ---
    let state = AppState { cache, store };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host: IpAddr = config
        .host
        .parse()
        .map_err(|_| StartupError::Host(config.host.clone()))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    workers.shutdown().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
