use diesel::prelude::*;
use mcpreg_registry::record::{RepositoryRecord, ServerRecord};

use crate::schema::{repositories, servers};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = servers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Server {
    pub id: i32,
    pub developer: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub version: Option<String>,
    pub server_type: String,
    pub registry_id: Option<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub is_latest: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = repositories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Repository {
    pub id: i32,
    pub server_id: i32,
    pub url: Option<String>,
    pub source: Option<String>,
    pub subfolder: Option<String>,
    pub repo_id: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = servers)]
pub struct NewServer<'a> {
    pub developer: &'a str,
    pub name: &'a str,
    pub full_name: &'a str,
    pub description: Option<&'a str>,
    pub status: Option<&'a str>,
    pub version: Option<&'a str>,
    pub server_type: &'a str,
    pub registry_id: Option<&'a str>,
    pub published_at: Option<&'a str>,
    pub updated_at: Option<&'a str>,
    pub is_latest: Option<bool>,
}

impl<'a> From<&'a ServerRecord> for NewServer<'a> {
    fn from(record: &'a ServerRecord) -> Self {
        Self {
            developer: &record.developer,
            name: &record.name,
            full_name: &record.full_name,
            description: record.description.as_deref(),
            status: record.status.as_deref(),
            version: record.version.as_deref(),
            server_type: record.server_type.as_str(),
            registry_id: record.registry_id.as_deref(),
            published_at: record.published_at.as_deref(),
            updated_at: record.updated_at.as_deref(),
            is_latest: record.is_latest,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = repositories)]
pub struct NewRepository<'a> {
    pub server_id: i32,
    pub url: Option<&'a str>,
    pub source: Option<&'a str>,
    pub subfolder: Option<&'a str>,
    pub repo_id: Option<&'a str>,
}

impl<'a> NewRepository<'a> {
    /// Links a normalized repository to the server row it belongs to.
    pub fn for_server(server_id: i32, record: &'a RepositoryRecord) -> Self {
        Self {
            server_id,
            url: record.url.as_deref(),
            source: record.source.as_deref(),
            subfolder: record.subfolder.as_deref(),
            repo_id: record.repo_id.as_deref(),
        }
    }
}
