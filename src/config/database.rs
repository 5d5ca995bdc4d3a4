//! Database configuration module for the status service.
//!
//! This module handles the SeaORM connection and table creation. Tables are generated
//! from the entity definitions with `Schema::create_table_from_entity`, so the schema
//! always matches the Rust structs without hand-written SQL.

use crate::entities::{Status, StatusColumn};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default location of the `SQLite` database file.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/status_keeper.sqlite?mode=rwc";

/// Resolves the database URL: `DATABASE_URL` from the environment wins over `configured`.
#[must_use]
pub fn get_database_url(configured: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| configured.to_string())
}

/// Establishes a connection to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first.
#[instrument(skip(database_url))]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Creates the status table and its ordering index if they do not exist yet.
///
/// The index covers `(root, change_date)`, which is exactly the filter and sort
/// used by every read query.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let status_table = schema
        .create_table_from_entity(Status)
        .if_not_exists()
        .to_owned();
    let status_index = Index::create()
        .if_not_exists()
        .name("idx_statusentity_root_change_date")
        .table(Status)
        .col(StatusColumn::Root)
        .col(StatusColumn::ChangeDate)
        .to_owned();

    db.execute(builder.build(&status_table)).await?;
    db.execute(builder.build(&status_index)).await?;

    info!("Database tables ensured");
    Ok(())
}
