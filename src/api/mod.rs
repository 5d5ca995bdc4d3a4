//! HTTP JSON API for the status service.
//!
//! Endpoints:
//! - POST /v1/status           - Record a status (201, body = new id)
//! - GET  /v1/status           - Statuses since `?dateFrom=` (RFC3339), newest first
//! - GET  /v1/status/current   - The most recent status as a one-element array
//!
//! Errors are answered in plain text.

mod error;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use crate::core::DateLayout;
use crate::errors::Result;

use self::handlers::{handle_current_status, handle_list_status, handle_not_found, handle_submit_status};

/// Collection endpoint for status records.
pub const STATUS_PATH: &str = "/v1/status";

/// Sub-endpoint answering the most recent status.
pub const CURRENT_STATUS_PATH: &str = "/v1/status/current";

/// Shared data available to all handlers.
#[derive(Debug)]
pub struct AppState {
    /// Database connection for all storage operations
    pub database: DatabaseConnection,
    /// Layout used for `changeDate` in requests and responses
    pub layout: DateLayout,
}

impl AppState {
    /// Creates handler state over an open connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection, layout: DateLayout) -> Self {
        Self { database, layout }
    }
}

/// Builds the application router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            STATUS_PATH,
            get(handle_list_status).post(handle_submit_status),
        )
        .route(CURRENT_STATUS_PATH, get(handle_current_status))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `bind_address` until Ctrl+C is received.
#[instrument(skip(state))]
pub async fn serve(state: Arc<AppState>, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Status service listening on http://{}", bind_address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
