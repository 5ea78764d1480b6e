//! Invite code repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store the single invite code of a list under a system-wide uniqueness
//!   constraint on the code text.
//! - Revoke codes and redeem them into memberships.
//!
//! # Invariants
//! - At most one code row per list (`invite_codes.list_id` is the key).
//! - A code is active while `now < expires_at`; only active codes redeem.
//! - Expired code text may be reused by another list.

use crate::model::shoplist::{CollaboratorId, ListId, ShareCode};
use crate::repo::{ensure_connection_ready, is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Repository interface for invite codes.
pub trait InviteRepository {
    /// Binds `code` to the list, replacing any previous code of that list.
    ///
    /// Returns `Ok(false)` without changing anything when `code` is held by
    /// another list's active code.
    fn store_share_code(
        &self,
        list_id: ListId,
        code: &str,
        now_ms: i64,
        expires_at: i64,
    ) -> RepoResult<bool>;
    /// Loads the list's code if it is still active at `now_ms`.
    fn active_share_code(&self, list_id: ListId, now_ms: i64) -> RepoResult<Option<ShareCode>>;
    /// Expires the list's active code at `now_ms`; returns whether one existed.
    fn revoke_share_code(&self, list_id: ListId, now_ms: i64) -> RepoResult<bool>;
    /// Adds `collaborator_id` to the list bound to an active `code`.
    fn redeem_share_code(
        &self,
        code: &str,
        collaborator_id: CollaboratorId,
        now_ms: i64,
    ) -> RepoResult<ListId>;
}

/// SQLite-backed invite code repository.
pub struct SqliteInviteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInviteRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["invite_codes", "memberships", "shoplists"])?;
        Ok(Self { conn })
    }
}

impl InviteRepository for SqliteInviteRepository<'_> {
    fn store_share_code(
        &self,
        list_id: ListId,
        code: &str,
        now_ms: i64,
        expires_at: i64,
    ) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM invite_codes
             WHERE code = ?1
               AND expires_at <= ?2
               AND list_id <> ?3;",
            params![code, now_ms, list_id],
        )?;

        let stored = tx.execute(
            "INSERT INTO invite_codes (list_id, code, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (list_id) DO UPDATE
             SET code = excluded.code,
                 expires_at = excluded.expires_at,
                 created_at = excluded.created_at;",
            params![list_id, code, expires_at, now_ms],
        );
        match stored {
            Ok(_) => {
                tx.commit()?;
                Ok(true)
            }
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn active_share_code(&self, list_id: ListId, now_ms: i64) -> RepoResult<Option<ShareCode>> {
        let code = self
            .conn
            .query_row(
                "SELECT list_id, code, expires_at
                 FROM invite_codes
                 WHERE list_id = ?1
                   AND expires_at > ?2;",
                params![list_id, now_ms],
                |row| {
                    Ok(ShareCode {
                        list_id: row.get("list_id")?,
                        code: row.get("code")?,
                        expires_at: row.get("expires_at")?,
                    })
                },
            )
            .optional()?;
        Ok(code)
    }

    fn revoke_share_code(&self, list_id: ListId, now_ms: i64) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE invite_codes
             SET expires_at = ?2
             WHERE list_id = ?1
               AND expires_at > ?2;",
            params![list_id, now_ms],
        )?;
        Ok(changed > 0)
    }

    fn redeem_share_code(
        &self,
        code: &str,
        collaborator_id: CollaboratorId,
        now_ms: i64,
    ) -> RepoResult<ListId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let list_id: ListId = tx
            .query_row(
                "SELECT list_id
                 FROM invite_codes
                 WHERE code = ?1
                   AND expires_at > ?2;",
                params![code, now_ms],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(RepoError::CodeNotFound)?;

        let inserted = tx.execute(
            "INSERT INTO memberships (list_id, collaborator_id, joined_at)
             VALUES (?1, ?2, ?3);",
            params![list_id, collaborator_id.to_string(), now_ms],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::DuplicateMembership {
                    list_id,
                    collaborator_id,
                });
            }
            Err(err) => return Err(err.into()),
        }

        tx.commit()?;
        Ok(list_id)
    }
}
