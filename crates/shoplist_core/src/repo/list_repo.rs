//! List and membership repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Load a list's roster (owner, name, members with display names) in one read.
//! - Create, rename and depart from lists atomically.
//!
//! # Invariants
//! - A list row and its owner's membership row are created together.
//! - Departures re-read the roster inside the write transaction and act on
//!   that snapshot only.
//! - Dissolution deletes memberships, items and invite codes before the list
//!   row, in the same transaction.

use crate::model::departure::{plan_departure, Departure};
use crate::model::now_epoch_ms;
use crate::model::shoplist::{CollaboratorId, ListId, ListSummary, Member, Roster};
use crate::repo::{ensure_connection_ready, parse_collaborator_id, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const ROSTER_SQL: &str = "SELECT
    l.id AS list_id,
    l.name AS name,
    l.owner_id AS owner_id,
    m.collaborator_id AS collaborator_id,
    m.joined_at AS joined_at,
    c.display_name AS display_name
FROM shoplists l
LEFT JOIN memberships m ON m.list_id = l.id
LEFT JOIN collaborators c ON c.id = m.collaborator_id
WHERE l.id = ?1
ORDER BY m.joined_at ASC, m.collaborator_id ASC;";

/// Repository interface for lists and their memberships.
pub trait ListRepository {
    /// Loads owner, name and members of one list; `None` when no list row exists.
    fn load_roster(&self, list_id: ListId) -> RepoResult<Option<Roster>>;
    /// Creates one list plus the owner's membership and returns the new id.
    fn create_list(&self, owner_id: CollaboratorId, name: &str) -> RepoResult<ListId>;
    /// Renames a list, guarded on the current owner.
    fn rename_list(&self, list_id: ListId, owner_id: CollaboratorId, name: &str)
        -> RepoResult<()>;
    /// Removes one collaborator, dissolving the list or moving ownership as needed.
    fn depart(&self, list_id: ListId, collaborator_id: CollaboratorId) -> RepoResult<Departure>;
    /// Lists every list the collaborator belongs to, ordered by id.
    fn lists_for(&self, collaborator_id: CollaboratorId) -> RepoResult<Vec<ListSummary>>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &["shoplists", "memberships", "collaborators", "items", "invite_codes"],
        )?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn load_roster(&self, list_id: ListId) -> RepoResult<Option<Roster>> {
        query_roster(self.conn, list_id)
    }

    fn create_list(&self, owner_id: CollaboratorId, name: &str) -> RepoResult<ListId> {
        let now = now_epoch_ms();
        let owner_text = owner_id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO shoplists (name, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3);",
            params![name, owner_text, now],
        )?;
        let list_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO memberships (list_id, collaborator_id, joined_at)
             VALUES (?1, ?2, ?3);",
            params![list_id, owner_text, now],
        )?;
        tx.commit()?;
        Ok(list_id)
    }

    fn rename_list(
        &self,
        list_id: ListId,
        owner_id: CollaboratorId,
        name: &str,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE shoplists
             SET name = ?3,
                 updated_at = ?4
             WHERE id = ?1
               AND owner_id = ?2;",
            params![list_id, owner_id.to_string(), name, now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::ListNotFound(list_id));
        }
        Ok(())
    }

    fn depart(&self, list_id: ListId, collaborator_id: CollaboratorId) -> RepoResult<Departure> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let roster = query_roster(&tx, list_id)?.ok_or(RepoError::ListNotFound(list_id))?;
        let plan = plan_departure(&roster, collaborator_id).ok_or(RepoError::NotMember {
            list_id,
            collaborator_id,
        })?;

        match plan {
            Departure::Dissolved => delete_list_cascade(&tx, list_id)?,
            Departure::OwnershipTransferred { successor } => {
                tx.execute(
                    "UPDATE shoplists
                     SET owner_id = ?2,
                         updated_at = ?3
                     WHERE id = ?1;",
                    params![list_id, successor.to_string(), now_epoch_ms()],
                )?;
                remove_membership(&tx, list_id, collaborator_id)?;
            }
            Departure::Departed => remove_membership(&tx, list_id, collaborator_id)?,
        }

        tx.commit()?;
        Ok(plan)
    }

    fn lists_for(&self, collaborator_id: CollaboratorId) -> RepoResult<Vec<ListSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                l.id AS list_id,
                l.name AS name,
                l.owner_id AS owner_id,
                (SELECT COUNT(*) FROM memberships all_m WHERE all_m.list_id = l.id)
                    AS member_count
             FROM shoplists l
             INNER JOIN memberships m ON m.list_id = l.id
             WHERE m.collaborator_id = ?1
             ORDER BY l.id ASC;",
        )?;
        let mut rows = stmt.query([collaborator_id.to_string()])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let owner_text: String = row.get("owner_id")?;
            summaries.push(ListSummary {
                list_id: row.get("list_id")?,
                name: row.get("name")?,
                owner_id: parse_collaborator_id(&owner_text, "shoplists.owner_id")?,
                member_count: row.get("member_count")?,
            });
        }
        Ok(summaries)
    }
}

/// Reads one roster with a single statement so owner and members come from
/// the same snapshot.
pub(crate) fn query_roster(conn: &Connection, list_id: ListId) -> RepoResult<Option<Roster>> {
    let mut stmt = conn.prepare(ROSTER_SQL)?;
    let mut rows = stmt.query([list_id])?;

    let Some(first) = rows.next()? else {
        return Ok(None);
    };
    let owner_text: String = first.get("owner_id")?;
    let mut roster = Roster {
        list_id: first.get("list_id")?,
        name: first.get("name")?,
        owner_id: parse_collaborator_id(&owner_text, "shoplists.owner_id")?,
        members: Vec::new(),
    };
    push_member(&mut roster, first)?;
    while let Some(row) = rows.next()? {
        push_member(&mut roster, row)?;
    }

    if roster.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "list {list_id} has no memberships"
        )));
    }
    if !roster.contains(roster.owner_id) {
        return Err(RepoError::InvalidData(format!(
            "owner {} of list {list_id} is not a member",
            roster.owner_id
        )));
    }

    Ok(Some(roster))
}

fn push_member(roster: &mut Roster, row: &Row<'_>) -> RepoResult<()> {
    // LEFT JOIN yields one all-NULL member row for a list without memberships.
    let Some(collaborator_text) = row.get::<_, Option<String>>("collaborator_id")? else {
        return Ok(());
    };
    roster.members.push(Member {
        collaborator_id: parse_collaborator_id(&collaborator_text, "memberships.collaborator_id")?,
        display_name: row.get("display_name")?,
        joined_at: row.get("joined_at")?,
    });
    Ok(())
}

fn remove_membership(
    conn: &Connection,
    list_id: ListId,
    collaborator_id: CollaboratorId,
) -> RepoResult<()> {
    let removed = conn.execute(
        "DELETE FROM memberships
         WHERE list_id = ?1
           AND collaborator_id = ?2;",
        params![list_id, collaborator_id.to_string()],
    )?;
    if removed == 0 {
        return Err(RepoError::NotMember {
            list_id,
            collaborator_id,
        });
    }
    Ok(())
}

fn delete_list_cascade(conn: &Connection, list_id: ListId) -> RepoResult<()> {
    conn.execute("DELETE FROM memberships WHERE list_id = ?1;", [list_id])?;
    conn.execute("DELETE FROM items WHERE list_id = ?1;", [list_id])?;
    conn.execute("DELETE FROM invite_codes WHERE list_id = ?1;", [list_id])?;
    let removed = conn.execute("DELETE FROM shoplists WHERE id = ?1;", [list_id])?;
    if removed == 0 {
        return Err(RepoError::ListNotFound(list_id));
    }
    Ok(())
}
