//! Error types for mcpreg-core.

use std::fmt;

use mcpreg_db::DbError;
use mcpreg_registry::RegistryError;
use miette::Diagnostic;
use thiserror::Error;

/// Failure category of an ingestion run. Every category is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Response,
    MalformedPayload,
    Persistence,
    Schema,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Response => "response",
            ErrorKind::MalformedPayload => "malformed payload",
            ErrorKind::Persistence => "persistence",
            ErrorKind::Schema => "schema",
        };
        f.write_str(kind)
    }
}

/// Error that aborted an ingestion run.
///
/// The store is always left in its pre-run state when one of these is
/// returned from [`crate::Ingestor::run`].
#[derive(Error, Diagnostic, Debug)]
pub enum IngestError {
    #[error(transparent)]
    #[diagnostic(
        code(mcpreg::transport),
        help("The registry could not be reached; check your network connection, proxy and endpoint")
    )]
    Transport(RegistryError),

    #[error(transparent)]
    #[diagnostic(
        code(mcpreg::response),
        help("The registry answered with an error status; the previous snapshot was kept")
    )]
    Response(RegistryError),

    #[error(transparent)]
    #[diagnostic(
        code(mcpreg::malformed_payload),
        help("The listing did not have the expected shape; try --legacy-api or adjust the [api] config section")
    )]
    MalformedPayload(RegistryError),

    #[error(transparent)]
    #[diagnostic(
        code(mcpreg::persistence),
        help("Writing the snapshot failed and was rolled back; check the database path and disk space")
    )]
    Persistence(DbError),

    #[error(transparent)]
    #[diagnostic(
        code(mcpreg::schema),
        help("The snapshot tables could not be created; try removing the database file")
    )]
    Schema(DbError),
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::Transport(_) => ErrorKind::Transport,
            IngestError::Response(_) => ErrorKind::Response,
            IngestError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            IngestError::Persistence(_) => ErrorKind::Persistence,
            IngestError::Schema(_) => ErrorKind::Schema,
        }
    }
}

impl From<RegistryError> for IngestError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Response { .. } => IngestError::Response(err),
            RegistryError::MalformedPayload(_) => IngestError::MalformedPayload(err),
            RegistryError::Transport { .. }
            | RegistryError::InvalidUrl(_)
            | RegistryError::InvalidProxy { .. } => IngestError::Transport(err),
        }
    }
}

impl From<DbError> for IngestError {
    fn from(err: DbError) -> Self {
        IngestError::Persistence(err)
    }
}

impl From<diesel::result::Error> for IngestError {
    fn from(err: diesel::result::Error) -> Self {
        IngestError::Persistence(err.into())
    }
}

/// Result type alias for ingestion runs.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_errors_are_categorized() {
        let err: IngestError = RegistryError::Response {
            url: "https://registry.example.com/v0/servers".into(),
            status: 500,
            body: String::new(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Response);

        let err: IngestError = RegistryError::MalformedPayload("not an object".into()).into();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);

        let err: IngestError = RegistryError::InvalidUrl("::".into()).into();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_diesel_errors_are_persistence() {
        let err: IngestError = diesel::result::Error::RollbackTransaction.into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_error_code_names_category() {
        let err = IngestError::Schema(DbError::MigrationError("disk I/O error".into()));
        assert_eq!(err.code().unwrap().to_string(), "mcpreg::schema");
        assert_eq!(err.to_string(), "Database migration failed: disk I/O error");
    }
}
