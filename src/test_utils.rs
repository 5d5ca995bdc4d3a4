//! Shared test utilities for the status service.
//!
//! This module provides helpers for setting up test databases and router state.

use crate::{api::AppState, core::DateLayout, errors::Result};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates router state over a fresh in-memory database and the default layout.
pub async fn setup_test_state() -> Result<Arc<AppState>> {
    let db = setup_test_db().await?;
    Ok(Arc::new(AppState::new(db, DateLayout::default())))
}
