//! Core business logic - framework-agnostic status operations.

/// Wire date layouts and RFC3339 filter parsing
pub mod date_layout;
/// The status record service: submit, query all, query latest
pub mod status;

pub use date_layout::DateLayout;
pub use status::{StatusRecord, query_all, query_latest, submit};
