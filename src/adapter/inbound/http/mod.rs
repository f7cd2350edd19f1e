//! HTTP dashboard (axum).
//!
//! Serves a static status page and a small JSON API over the tracking
//! service and the stock-check orchestrator.

mod handlers;
mod response;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::application::TrackingService;
use crate::error::Result;
use crate::port::CheckControl;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    tracking: TrackingService,
    checker: Arc<dyn CheckControl>,
    started: Instant,
}

impl AppState {
    pub fn new(tracking: TrackingService, checker: Arc<dyn CheckControl>) -> Self {
        Self {
            tracking,
            checker,
            started: Instant::now(),
        }
    }
}

/// Build the dashboard router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/api/health", get(handlers::health))
        .route(
            "/api/products",
            get(handlers::list_products)
                .post(handlers::add_product)
                .delete(handlers::remove_product),
        )
        .route("/api/status", get(handlers::status))
        .route("/api/stats", get(handlers::stats))
        .route("/api/check", post(handlers::force_check))
        .fallback(response::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind the listener; split from [`serve`] so callers learn the real port.
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Dashboard listening");
    Ok(listener)
}

/// Serve the dashboard until `shutdown` resolves, then drain open requests.
///
/// # Errors
/// Returns an error if the server fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Dashboard stopped");
    Ok(())
}
