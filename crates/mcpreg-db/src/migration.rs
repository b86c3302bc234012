//! Schema loading for the snapshot store.
//!
//! The table definitions are embedded as versioned diesel migrations. A run
//! never migrates a previous snapshot forward: [`reset`] drops whatever is
//! there and applies the embedded definitions from scratch.

use diesel::{connection::SimpleConnection, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::debug;

use crate::error::{DbError, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Drops in dependency order: repositories reference servers.
const DROP_SNAPSHOT: &str = "\
    DROP TABLE IF EXISTS repositories;\
    DROP TABLE IF EXISTS servers;\
    DROP TABLE IF EXISTS __diesel_schema_migrations;";

/// Applies any embedded migrations not yet recorded in the database.
pub fn apply_migrations(conn: &mut SqliteConnection) -> Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    debug!("Applied {} schema migration(s)", applied.len());
    Ok(())
}

/// Destroys the stored snapshot and recreates an empty schema.
///
/// Idempotent: a populated store and a fresh file end up in the same state.
/// Runs inside the caller's transaction when one is open, so a later
/// rollback restores the previous snapshot as well.
pub fn reset(conn: &mut SqliteConnection) -> Result<()> {
    conn.batch_execute(DROP_SNAPSHOT)
        .map_err(|e| DbError::MigrationError(format!("dropping previous snapshot: {e}")))?;

    apply_migrations(conn)
}
