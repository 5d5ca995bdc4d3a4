//! Unified error types for the status service.
//!
//! Storage failures are classified once, when a `DbErr` is converted into
//! [`Error`], so every caller sees either [`Error::OverQuota`] or
//! [`Error::Database`].

use sea_orm::DbErr;
use thiserror::Error;

/// Backend messages that indicate a capacity limit rather than a fault.
const OVER_QUOTA_MARKERS: &[&str] = &["database or disk is full", "over quota", "quota exceeded"];

/// Every failure the service reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// A caller-supplied date did not match the expected format
    #[error("{reason} - Correct format is {expected}")]
    InvalidDate {
        /// Parser message
        reason: String,
        /// Layout or standard the value must follow
        expected: String,
    },

    /// The request body could not be decoded
    #[error("Invalid request body: {message}")]
    InvalidBody {
        /// Decoder message
        message: String,
    },

    /// The store holds no status yet
    #[error("No status has been recorded yet")]
    NoStatusRecorded,

    /// The storage backend ran out of capacity
    #[error("503 - Over Quota")]
    OverQuota,

    /// Any other storage failure
    #[error("{0}")]
    Database(DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        if is_over_quota(&err) {
            Self::OverQuota
        } else {
            Self::Database(err)
        }
    }
}

/// Reports whether the storage backend rejected the call for lack of capacity.
#[must_use]
pub fn is_over_quota(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    OVER_QUOTA_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
