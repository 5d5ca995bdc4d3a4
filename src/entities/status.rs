//! Status entity - One observation of the monitored service's health.
//!
//! Rows are append-only. Every row carries the same `root` grouping key so
//! range and ordering queries always run over a single scope.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Grouping key shared by every status row.
pub const STATUS_ROOT_KEY: &str = "statusroot";

/// Status database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "statusentity")]
pub struct Model {
    /// Storage-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Partition key, always [`STATUS_ROOT_KEY`]
    pub root: String,
    /// Caller-defined code (100 = ok, 200 = partial failure, 300 = service down)
    pub status: i64,
    /// When the status became effective
    pub change_date: DateTimeUtc,
}

/// `Status` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
