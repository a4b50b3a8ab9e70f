//! Policy Cache daemon
//!
//! Serves the process-wide document cache over HTTP and keeps it within its
//! policies with a background maintenance task.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use policy_cache::api::create_router;
use policy_cache::{spawn_maintenance_task, AppState, Config, MaintenanceSchedule};

/// Main entry point for the cache daemon.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Apply the policy table to the process-wide cache
/// 4. Start the background maintenance task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Policy Cache daemon");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, clean_interval={}s, pressure_interval={}s, min_age={}s",
        config.server_port, config.clean_interval, config.pressure_interval, config.min_age
    );

    let cache_config = config.load_cache_config()?;
    for type_config in cache_config.types.iter().filter(|t| !t.seed_queries.is_empty()) {
        info!(
            type_name = %type_config.type_name,
            queries = type_config.seed_queries.len(),
            "Seed queries are left to the loader"
        );
    }

    let state = AppState::current();
    state.cache.apply_config(&cache_config);
    state
        .cache
        .set_min_age(Duration::from_secs(config.min_age));
    info!(types = cache_config.types.len(), "Cache initialized");

    let maintenance_handle = spawn_maintenance_task(
        state.cache.clone(),
        MaintenanceSchedule::from_config(&config),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(maintenance_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the maintenance task and allows graceful shutdown.
async fn shutdown_signal(maintenance_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    maintenance_handle.abort();
    warn!("Maintenance task aborted");
}
