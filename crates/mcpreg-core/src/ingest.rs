//! Ingestion driver.
//!
//! A run replaces the stored snapshot with the current registry listing:
//!
//! ```text
//! Start -> Resetting -> Paging(cursor) -> Committing -> Done
//!              \_____________|______________/
//!                            v
//!                         Aborted
//! ```
//!
//! The reset and every page are written inside one immediate transaction, so
//! readers only ever see the previous snapshot or the complete new one.

use diesel::SqliteConnection;
use mcpreg_config::Config;
use mcpreg_db::{
    connection::DbConnection,
    migration,
    models::{NewRepository, NewServer},
    repository::RegistryRepository,
    DbError,
};
use mcpreg_registry::{normalize, PageFetcher, PageSource, RegistryError};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

/// Phase of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Start,
    Resetting,
    /// Fetching and storing the page at `cursor`; `None` is the first page.
    Paging {
        cursor: Option<String>,
    },
    Committing,
    Done,
    Aborted,
}

/// Totals of a committed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Entries persisted.
    pub processed: usize,
    /// Pages fetched.
    pub pages: usize,
    /// Repository rows persisted.
    pub repositories: usize,
}

/// Drives one ingestion run from a [`PageSource`] into the configured store.
pub struct Ingestor<S> {
    config: Config,
    source: S,
    state: RunState,
}

impl Ingestor<PageFetcher> {
    /// Creates an ingestor fetching over HTTP from `config.endpoint`.
    pub fn from_config(config: Config) -> Result<Self> {
        let source = PageFetcher::new(&config)?;
        Ok(Self::new(config, source))
    }
}

impl<S: PageSource> Ingestor<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self {
            config,
            source,
            state: RunState::Start,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the stored snapshot with the full listing.
    ///
    /// On success the new snapshot is committed and its totals returned. On
    /// any failure the transaction is rolled back, leaving the store exactly
    /// as it was before the run.
    pub fn run(&mut self) -> Result<RunReport> {
        self.state = RunState::Start;
        info!(
            "Syncing {} into {}",
            self.config.endpoint,
            self.config.db_path.display()
        );

        let result = self.open().and_then(|mut db| {
            db.conn()
                .immediate_transaction(|conn| self.ingest(conn))
        });

        match &result {
            Ok(report) => {
                self.state = RunState::Done;
                info!(
                    "Committed {} servers ({} repositories) from {} page(s)",
                    report.processed, report.repositories, report.pages
                );
            }
            Err(err) => {
                warn!(
                    "Sync aborted in {:?} ({} error), previous snapshot kept",
                    self.state,
                    err.kind()
                );
                self.state = RunState::Aborted;
            }
        }

        result
    }

    fn open(&self) -> Result<DbConnection> {
        DbConnection::open(&self.config.db_path)
            .map_err(|err| IngestError::Persistence(DbError::from(err)))
    }

    fn ingest(&mut self, conn: &mut SqliteConnection) -> Result<RunReport> {
        self.state = RunState::Resetting;
        migration::reset(conn).map_err(IngestError::Schema)?;

        let mut report = RunReport::default();
        let mut cursor: Option<String> = None;

        loop {
            self.state = RunState::Paging {
                cursor: cursor.clone(),
            };

            let page = self.source.fetch_page(cursor.as_deref())?;
            report.pages += 1;

            for raw in &page.entries {
                let entry = normalize(raw, &self.config.api)?;
                let server_id =
                    RegistryRepository::insert_server(conn, &NewServer::from(&entry.server))?;

                if let Some(repository) = &entry.repository {
                    RegistryRepository::insert_repository(
                        conn,
                        &NewRepository::for_server(server_id, repository),
                    )?;
                    report.repositories += 1;
                }

                report.processed += 1;
            }

            info!(
                "Stored page {} ({} entries, {} total)",
                report.pages,
                page.entries.len(),
                report.processed
            );

            match page.next_cursor {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    return Err(IngestError::MalformedPayload(
                        RegistryError::MalformedPayload(format!(
                            "listing returned cursor {next} for its own page"
                        )),
                    ));
                }
                Some(next) => {
                    debug!("Following cursor {}", next);
                    cursor = Some(next);
                }
                None => break,
            }
        }

        self.state = RunState::Committing;
        Ok(report)
    }
}
