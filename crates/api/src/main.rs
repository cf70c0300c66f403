use std::net::SocketAddr;
use std::sync::Arc;

use skiadmin_core::service::Services;
use skiadmin_core::validation::Validator;
use skiadmin_db::{PgSkiLiftStore, PgSportStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skiadmin_api::app::build_app;
use skiadmin_api::config::{ServerConfig, StorageBackend};
use skiadmin_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skiadmin_api=debug,skiadmin_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = config.storage.name(),
        "Loaded server configuration"
    );

    // --- Storage ---
    let validator = Arc::new(Validator::new());
    let services = match &config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage; data is lost on restart");
            Services::in_memory(validator)
        }
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = skiadmin_db::create_pool(database_url, *max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!(max_connections, "Database connection pool created");

            skiadmin_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            skiadmin_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Services::new(
                validator,
                Arc::new(PgSportStore::new(pool.clone())),
                Arc::new(PgSkiLiftStore::new(pool)),
            )
        }
    };

    // --- App state ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState {
        config: Arc::new(config),
        services,
    };
    let app = build_app(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
