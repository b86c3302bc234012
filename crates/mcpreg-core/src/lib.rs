//! Ingestion driver for the mcpreg registry ingester.
//!
//! [`Ingestor`] ties the registry client and the snapshot store together:
//! it resets the store, walks every listing page, normalizes and inserts each
//! entry, and commits the whole run at once.

pub mod error;
pub mod ingest;

pub use error::{ErrorKind, IngestError, Result};
pub use ingest::{Ingestor, RunReport, RunState};
