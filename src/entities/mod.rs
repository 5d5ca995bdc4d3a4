//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod status;

pub use status::{Column as StatusColumn, Entity as Status, Model as StatusModel};
