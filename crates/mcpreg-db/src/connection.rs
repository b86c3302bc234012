//! Database connection management.

use std::path::Path;

use diesel::{connection::SimpleConnection, Connection, ConnectionError, SqliteConnection};

/// Pragmas applied to every connection. Foreign keys are off by default in
/// SQLite and must be enabled per connection, outside any transaction.
const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;";

/// Database connection wrapper.
pub struct DbConnection {
    conn: SqliteConnection,
}

impl DbConnection {
    /// Opens (creating if needed) the SQLite database at `path`.
    ///
    /// The schema is not touched; see [`crate::migration::reset`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConnectionError> {
        let path_str = path.as_ref().to_string_lossy();
        Self::establish(&path_str)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, ConnectionError> {
        Self::establish(":memory:")
    }

    fn establish(url: &str) -> Result<Self, ConnectionError> {
        let mut conn = SqliteConnection::establish(url)?;

        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Gets a mutable reference to the underlying connection.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl std::ops::Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl std::ops::DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
