//! Normalized record shapes produced from raw registry entries.

use std::fmt;

/// How a server is reached, derived from the collections an entry lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    /// Has at least one remote endpoint.
    Remote,
    /// No remotes, but at least one installable package.
    Local,
    /// Neither remotes nor packages.
    Unknown,
}

impl ServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerType::Remote => "remote",
            ServerType::Local => "local",
            ServerType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listed server version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    /// Namespace part of `full_name`; empty when the name has no `/`.
    pub developer: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub version: Option<String>,
    pub server_type: ServerType,
    pub registry_id: Option<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub is_latest: Option<bool>,
}

/// Source repository of a server. Linked to its server row at insert time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub url: Option<String>,
    pub source: Option<String>,
    pub subfolder: Option<String>,
    pub repo_id: Option<String>,
}

/// Result of normalizing one raw entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub server: ServerRecord,
    pub repository: Option<RepositoryRecord>,
}
