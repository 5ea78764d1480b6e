//! List entry repository.
//!
//! Entries carry no invariants of their own; access is gated by the service
//! layer on list membership.

use crate::model::now_epoch_ms;
use crate::model::shoplist::{CollaboratorId, Item, ItemId, ListId};
use crate::repo::{ensure_connection_ready, parse_collaborator_id, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for list entries.
pub trait ItemRepository {
    fn add_item(&self, list_id: ListId, added_by: CollaboratorId, label: &str)
        -> RepoResult<Item>;
    /// Entries of one list in insertion order.
    fn list_items(&self, list_id: ListId) -> RepoResult<Vec<Item>>;
    fn remove_item(&self, list_id: ListId, item_id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed list entry repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["items", "shoplists"])?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn add_item(
        &self,
        list_id: ListId,
        added_by: CollaboratorId,
        label: &str,
    ) -> RepoResult<Item> {
        let created_at = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO items (list_id, label, added_by, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![list_id, label, added_by.to_string(), created_at],
        )?;
        Ok(Item {
            item_id: self.conn.last_insert_rowid(),
            list_id,
            label: label.to_string(),
            added_by,
            created_at,
        })
    }

    fn list_items(&self, list_id: ListId) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, list_id, label, added_by, created_at
             FROM items
             WHERE list_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([list_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn remove_item(&self, list_id: ListId, item_id: ItemId) -> RepoResult<()> {
        let removed = self.conn.execute(
            "DELETE FROM items WHERE id = ?1 AND list_id = ?2;",
            params![item_id, list_id],
        )?;
        if removed == 0 {
            return Err(RepoError::ItemNotFound(item_id));
        }
        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let added_by_text: String = row.get("added_by")?;
    Ok(Item {
        item_id: row.get("id")?,
        list_id: row.get("list_id")?,
        label: row.get("label")?,
        added_by: parse_collaborator_id(&added_by_text, "items.added_by")?,
        created_at: row.get("created_at")?,
    })
}
