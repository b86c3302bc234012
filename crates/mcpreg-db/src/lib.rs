//! SQLite snapshot store for the mcpreg registry ingester.
//!
//! - [`connection`]: opening the database with the pragmas every run needs
//! - [`migration`]: embedded table definitions and the snapshot reset
//! - [`repository`]: inserts and reads for the `servers` and `repositories` tables

pub mod connection;
pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod schema;

pub use error::{DbError, Result};
