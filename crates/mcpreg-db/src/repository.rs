//! Repository pattern implementation for the snapshot tables.
//!
//! [`RegistryRepository`] is the store writer of an ingestion run plus the
//! read helpers used to inspect a stored snapshot. None of its methods commit;
//! transaction boundaries belong to the caller.

use diesel::prelude::*;

use crate::{
    models::{NewRepository, NewServer, Repository, Server},
    schema::{repositories, servers},
};

/// Repository for server and source-repository rows.
pub struct RegistryRepository;

impl RegistryRepository {
    /// Inserts a server row and returns its generated id.
    pub fn insert_server(conn: &mut SqliteConnection, server: &NewServer) -> QueryResult<i32> {
        diesel::insert_into(servers::table)
            .values(server)
            .returning(servers::id)
            .get_result(conn)
    }

    /// Inserts the repository row of an already inserted server.
    pub fn insert_repository(
        conn: &mut SqliteConnection,
        repository: &NewRepository,
    ) -> QueryResult<usize> {
        diesel::insert_into(repositories::table)
            .values(repository)
            .execute(conn)
    }

    /// Counts stored servers.
    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        servers::table.count().get_result(conn)
    }

    /// Counts stored repositories.
    pub fn count_repositories(conn: &mut SqliteConnection) -> QueryResult<i64> {
        repositories::table.count().get_result(conn)
    }

    /// Lists all servers in insertion order.
    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Server>> {
        servers::table
            .order(servers::id.asc())
            .select(Server::as_select())
            .load(conn)
    }

    /// Finds the first server stored under a `developer/name` identifier.
    pub fn find_by_full_name(
        conn: &mut SqliteConnection,
        full_name: &str,
    ) -> QueryResult<Option<Server>> {
        servers::table
            .filter(servers::full_name.eq(full_name))
            .order(servers::id.asc())
            .select(Server::as_select())
            .first(conn)
            .optional()
    }

    /// Gets the repository linked to a server.
    pub fn repository_for(
        conn: &mut SqliteConnection,
        server_id: i32,
    ) -> QueryResult<Option<Repository>> {
        repositories::table
            .filter(repositories::server_id.eq(server_id))
            .select(Repository::as_select())
            .first(conn)
            .optional()
    }

    /// Lists servers together with their repository, if any.
    pub fn list_with_repositories(
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<(Server, Option<Repository>)>> {
        servers::table
            .left_join(repositories::table)
            .order(servers::id.asc())
            .select((Server::as_select(), Option::<Repository>::as_select()))
            .load(conn)
    }
}
