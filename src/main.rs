//! Product Catalog server binary
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Open the Postgres pool and bootstrap the schema when enabled
//! 4. Create the Meilisearch client and the response cache
//! 5. Start the background cache sweep task
//! 6. Serve HTTP until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_catalog::search::MeiliSearchIndex;
use product_catalog::store::PgCatalogStore;
use product_catalog::{create_router, spawn_cleanup_task, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Product Catalog server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, search_index={}, cache_ttl={}s, cache_max_entries={}, cleanup_interval={}s",
        config.server_port,
        config.search_index,
        config.cache_ttl,
        config.cache_max_entries,
        config.cleanup_interval
    );

    let store = PgCatalogStore::connect_lazy(&config).context("invalid database configuration")?;
    if config.db_auto_migrate && store.bootstrap_schema().await {
        info!("Catalog schema ready");
    }

    let index = MeiliSearchIndex::from_config(&config).context("failed to build search client")?;
    info!("Search index client ready for {}", config.search_host);

    let state = AppState::new(Arc::new(store), Arc::new(index), &config);

    let cleanup_handle = spawn_cleanup_task(state.cache.store(), config.cleanup_interval);
    info!("Background cache sweep task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the sweep task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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

    cleanup_handle.abort();
    warn!("Cache sweep task aborted");
}
