//! Listing Cache server entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use listing_cache::api::create_router;
use listing_cache::cache::CacheSetup;
use listing_cache::store::MemoryDocumentStore;
use listing_cache::{spawn_cleanup_task, AppState, Config};

/// # Startup Sequence
/// 1. Initialize tracing
/// 2. Load configuration from environment variables
/// 3. Connect the cache backend (Redis, in-process, or disabled)
/// 4. Start the expiry sweep for the in-process backend
/// 5. Build services, bootstrap the admin account, build the router
/// 6. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listing_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting listing backend");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        cache_enabled = config.cache_enabled,
        cache_ttl = config.cache_ttl,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    let setup = CacheSetup::from_config(&config).await;
    info!(backend = setup.cache.backend_name(), "cache ready");

    let cleanup_handle = setup
        .sweepable
        .map(|backend| spawn_cleanup_task(backend, config.cleanup_interval));

    let state = AppState::from_config(&config, Arc::new(MemoryDocumentStore::new()), setup.cache);
    match (&config.admin_email, &config.admin_password) {
        (Some(email), Some(password)) => {
            state
                .users
                .ensure_admin(email, password)
                .await
                .context("failed to bootstrap admin account")?;
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("ADMIN_EMAIL and ADMIN_PASSWORD must both be set, skipping admin bootstrap");
        }
        (None, None) => {}
    }

    let app = create_router(state, Duration::from_secs(config.request_timeout));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the expiry sweep.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
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
                warn!(error = %err, "failed to install SIGTERM handler");
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cache expiry sweep aborted");
    }
}
