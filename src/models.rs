//! Wire representations of status records.

use serde::{Deserialize, Serialize};

/// Body of a status submission. The id is assigned by storage, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSubmission {
    /// Caller-defined status code, not range-checked
    pub status: i64,
    /// Effective time in the configured layout; absent or empty means "now"
    #[serde(default)]
    pub change_date: Option<String>,
}

/// A status record as returned by the query endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    /// Storage-assigned identifier
    pub id: i64,
    /// Caller-defined status code
    pub status: i64,
    /// Effective time in the configured layout
    pub change_date: String,
}
