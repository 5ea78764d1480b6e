//! Collaborator display-name directory.
//!
//! The shared-list core only reads names from here (through the roster
//! query); writes exist so hosts can seed the directory.

use crate::model::shoplist::CollaboratorId;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub trait DirectoryRepository {
    /// Inserts or replaces the display name of one collaborator.
    fn upsert_collaborator(&self, collaborator_id: CollaboratorId, display_name: &str)
        -> RepoResult<()>;
    fn display_name(&self, collaborator_id: CollaboratorId) -> RepoResult<Option<String>>;
}

pub struct SqliteDirectoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDirectoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["collaborators"])?;
        Ok(Self { conn })
    }
}

impl DirectoryRepository for SqliteDirectoryRepository<'_> {
    fn upsert_collaborator(
        &self,
        collaborator_id: CollaboratorId,
        display_name: &str,
    ) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO collaborators (id, display_name)
             VALUES (?1, ?2)
             ON CONFLICT (id) DO UPDATE SET display_name = excluded.display_name;",
            params![collaborator_id.to_string(), display_name],
        )?;
        Ok(())
    }

    fn display_name(&self, collaborator_id: CollaboratorId) -> RepoResult<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT display_name FROM collaborators WHERE id = ?1;",
                [collaborator_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }
}
