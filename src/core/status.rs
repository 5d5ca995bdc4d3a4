//! Status record business logic - the append-only log of service health changes.
//!
//! Three operations are exposed: [`submit`] stores a new observation, [`query_all`]
//! lists observations since a point in time and [`query_latest`] returns the most
//! recent one. Rows are written under [`STATUS_ROOT_KEY`] and every read is scoped to
//! it. Identifier assignment is left to the storage backend, so no locking happens here.
//!
//! Reads decode rows column by column so a table whose shape drifted from the
//! entity (extra columns, missing `status`) still yields results.

use crate::{
    core::date_layout::{DateLayout, parse_rfc3339},
    entities::{Status, StatusColumn, status, status::STATUS_ROOT_KEY},
    errors::{Error, Result},
    models::{StatusSubmission, StatusView},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Asterisk, Expr};
use sea_orm::{FromQueryResult, QueryOrder, QueryResult, QuerySelect, Set, prelude::*};
use tracing::{debug, info, instrument, warn};

/// A stored status observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    /// Storage-assigned identifier
    pub id: i64,
    /// Caller-defined status code
    pub status: i64,
    /// When the status became effective
    pub change_date: DateTime<Utc>,
}

impl StatusRecord {
    /// Maps the record to its wire shape.
    #[must_use]
    pub fn to_view(&self, layout: &DateLayout) -> StatusView {
        StatusView {
            id: self.id,
            status: self.status,
            change_date: layout.format(&self.change_date),
        }
    }
}

/// One row read without a fixed schema.
///
/// `None` means the row lacks a usable `id` or `change_date` and is skipped.
#[derive(Debug)]
struct LenientStatusRow(Option<StatusRecord>);

impl FromQueryResult for LenientStatusRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> std::result::Result<Self, DbErr> {
        let id = match res.try_get::<i64>(pre, "id") {
            Ok(id) => id,
            Err(err) => {
                warn!("Skipping status row without a readable id: {}", err);
                return Ok(Self(None));
            }
        };
        let change_date = match res.try_get::<DateTimeUtc>(pre, "change_date") {
            Ok(change_date) => change_date,
            Err(err) => {
                warn!("Skipping status row {} without a readable change_date: {}", id, err);
                return Ok(Self(None));
            }
        };
        let status = res.try_get::<i64>(pre, "status").unwrap_or_else(|err| {
            debug!("Status row {} has no readable status, using 0: {}", id, err);
            0
        });

        Ok(Self(Some(StatusRecord {
            id,
            status,
            change_date,
        })))
    }
}

/// Inserts a status row under the shared root and returns the storage-assigned id.
#[instrument(skip(db))]
pub async fn insert_status(
    db: &DatabaseConnection,
    status_code: i64,
    change_date: DateTime<Utc>,
) -> Result<i64> {
    let row = status::ActiveModel {
        root: Set(STATUS_ROOT_KEY.to_string()),
        status: Set(status_code),
        change_date: Set(change_date),
        ..Default::default()
    };

    let result = Status::insert(row).exec(db).await?;
    info!(
        "Recorded status {} effective {} as id {}",
        status_code, change_date, result.last_insert_id
    );
    Ok(result.last_insert_id)
}

/// Retrieves every status with `change_date >= date_from`, newest first.
///
/// `None` applies no lower bound.
#[instrument(skip(db))]
pub async fn find_statuses_since(
    db: &DatabaseConnection,
    date_from: Option<DateTime<Utc>>,
) -> Result<Vec<StatusRecord>> {
    let mut query = Status::find()
        .select_only()
        .expr(Expr::col(Asterisk))
        .filter(StatusColumn::Root.eq(STATUS_ROOT_KEY));
    if let Some(date_from) = date_from {
        query = query.filter(StatusColumn::ChangeDate.gte(date_from));
    }

    let rows = query
        .order_by_desc(StatusColumn::ChangeDate)
        .into_model::<LenientStatusRow>()
        .all(db)
        .await?;

    let records: Vec<StatusRecord> = rows.into_iter().filter_map(|row| row.0).collect();
    debug!("Found {} status records", records.len());
    Ok(records)
}

/// Rows fetched per round while looking for the newest decodable status.
const LATEST_SCAN_BATCH: u64 = 16;

/// Retrieves the status with the greatest `change_date`, or `None` for an empty store.
///
/// Rows that cannot be decoded are passed over, so the result always matches the
/// first record of [`find_statuses_since`] with no lower bound.
#[instrument(skip(db))]
pub async fn find_latest_status(db: &DatabaseConnection) -> Result<Option<StatusRecord>> {
    let mut offset: u64 = 0;
    loop {
        let rows = Status::find()
            .select_only()
            .expr(Expr::col(Asterisk))
            .filter(StatusColumn::Root.eq(STATUS_ROOT_KEY))
            .order_by_desc(StatusColumn::ChangeDate)
            .offset(offset)
            .limit(LATEST_SCAN_BATCH)
            .into_model::<LenientStatusRow>()
            .all(db)
            .await?;

        let fetched = rows.len() as u64;
        if let Some(record) = rows.into_iter().find_map(|row| row.0) {
            return Ok(Some(record));
        }
        if fetched < LATEST_SCAN_BATCH {
            return Ok(None);
        }
        offset += fetched;
    }
}

/// Stores a submitted status and returns its new id.
///
/// A missing or empty `changeDate` defaults to the current time. A value that does not
/// match `layout` is rejected with `Error::InvalidDate`. The status code is not validated.
#[instrument(skip(db, layout))]
pub async fn submit(
    db: &DatabaseConnection,
    layout: &DateLayout,
    submission: &StatusSubmission,
) -> Result<i64> {
    let change_date = layout
        .parse_optional(submission.change_date.as_deref())?
        .unwrap_or_else(Utc::now);

    insert_status(db, submission.status, change_date).await
}

/// Lists statuses since `date_from` (strict RFC3339), newest first, in wire shape.
///
/// An absent or empty filter lists everything. No matches is an empty list.
#[instrument(skip(db, layout))]
pub async fn query_all(
    db: &DatabaseConnection,
    layout: &DateLayout,
    date_from: Option<&str>,
) -> Result<Vec<StatusView>> {
    let date_from = match date_from {
        Some(value) if !value.is_empty() => Some(parse_rfc3339(value)?),
        _ => None,
    };

    let records = find_statuses_since(db, date_from).await?;
    Ok(records.iter().map(|record| record.to_view(layout)).collect())
}

/// Returns the most recent status as a one-element list.
///
/// An empty store yields `Error::NoStatusRecorded`.
#[instrument(skip(db, layout))]
pub async fn query_latest(db: &DatabaseConnection, layout: &DateLayout) -> Result<Vec<StatusView>> {
    let latest = find_latest_status(db)
        .await?
        .ok_or(Error::NoStatusRecorded)?;

    Ok(vec![latest.to_view(layout)])
}
