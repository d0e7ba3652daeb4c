//! HTTP server
//!
//! Exposes the OTA surface:
//!
//! - `GET /downloads` - HTML listing of the artifact store
//! - `GET /downloads/:file` - artifact bytes
//! - `GET /api/manifest?file=..` - install manifest (`application/x-plist`)
//!
//! Every handler is request-scoped. The shared state is read-only: the
//! store handle, the host resolver and the manifest defaults.

mod handlers;
mod page;

pub use handlers::*;
pub use page::render_listing;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use ota_core::{ArtifactRegistry, ArtifactServer, HostResolver, ManifestDefaults, OtaConfig};
use ota_schema::{DOWNLOADS_PREFIX, MANIFEST_ROUTE};
use std::sync::Arc;

/// Read-only state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: ArtifactRegistry,
    pub artifacts: ArtifactServer,
    pub resolver: HostResolver,
    pub defaults: ManifestDefaults,
}

/// State handle passed to handlers.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build handler state from configuration.
    pub fn from_config(config: &OtaConfig) -> Self {
        let registry = ArtifactRegistry::new(&config.store_dir);
        Self {
            artifacts: ArtifactServer::new(registry.clone()),
            registry,
            resolver: HostResolver::new(&config.tunnel_suffixes),
            defaults: config.defaults.clone(),
        }
    }
}

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(DOWNLOADS_PREFIX, get(listing))
        .route(&format!("{DOWNLOADS_PREFIX}/:file"), get(download))
        .route(MANIFEST_ROUTE, get(manifest))
        .with_state(state)
}

/// Bind, serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(config: &OtaConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    let addr = listener.local_addr()?;

    if !config.store_dir.is_dir() {
        tracing::warn!(
            store = %config.store_dir.display(),
            "artifact store does not exist yet; listing will be empty"
        );
    }
    tracing::info!(%addr, store = %config.store_dir.display(), "serving artifacts");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
