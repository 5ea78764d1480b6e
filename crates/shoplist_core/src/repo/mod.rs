//! Repository layer: use-case oriented data access contracts and their
//! SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL and transaction boundaries out of the service layer.
//! - Execute every multi-row mutation inside one IMMEDIATE transaction.
//!
//! # Invariants
//! - Repositories only accept connections migrated to the latest version.
//! - Read paths reject persisted state that breaks list invariants instead of
//!   masking it.

pub mod directory_repo;
pub mod invite_repo;
pub mod item_repo;
pub mod list_repo;

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::shoplist::{CollaboratorId, ItemId, ListId};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No list row exists for the id.
    ListNotFound(ListId),
    /// The list exists but the collaborator holds no membership on it.
    NotMember {
        list_id: ListId,
        collaborator_id: CollaboratorId,
    },
    /// Membership insert hit the `(list_id, collaborator_id)` key.
    DuplicateMembership {
        list_id: ListId,
        collaborator_id: CollaboratorId,
    },
    /// No active invite code matches.
    CodeNotFound,
    /// Every generated candidate collided with another list's active code.
    CodeConflict { attempts: u32 },
    /// No item row with this id on the list.
    ItemNotFound(ItemId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::NotMember {
                list_id,
                collaborator_id,
            } => write!(f, "collaborator {collaborator_id} is not a member of list {list_id}"),
            Self::DuplicateMembership {
                list_id,
                collaborator_id,
            } => write!(
                f,
                "collaborator {collaborator_id} is already a member of list {list_id}"
            ),
            Self::CodeNotFound => write!(f, "no active invite code matches"),
            Self::CodeConflict { attempts } => {
                write!(f, "share code still conflicting after {attempts} attempts")
            }
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Returns whether a failed statement tripped a UNIQUE or PRIMARY KEY constraint.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => matches!(
            inner.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        ),
        _ => false,
    }
}

pub(crate) fn parse_collaborator_id(value: &str, column: &'static str) -> RepoResult<CollaboratorId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
