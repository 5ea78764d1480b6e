//! Shared-list use-case services.
//!
//! # Responsibility
//! - Gate every operation on the list roster before touching storage.
//! - Translate repository failures into the `ShoplistError` taxonomy.
//!
//! # Invariants
//! - Non-members and missing lists produce the same `NotFound` outcome.
//! - Services hold no state between calls besides their repositories.

pub mod error;
pub mod invite_service;
pub mod item_service;
pub mod list_service;

use crate::model::shoplist::{CollaboratorId, ListId, Roster};
use crate::repo::list_repo::ListRepository;
use self::error::ShoplistError;

/// Loads the roster if `caller` may see the list.
///
/// A missing list and a list the caller does not belong to both yield
/// `ShoplistError::NotFound`.
pub(crate) fn visible_roster<R: ListRepository + ?Sized>(
    lists: &R,
    caller: CollaboratorId,
    list_id: ListId,
) -> Result<Roster, ShoplistError> {
    match lists.load_roster(list_id) {
        Ok(Some(roster)) if roster.contains(caller) => Ok(roster),
        Ok(_) => Err(ShoplistError::NotFound(list_id)),
        Err(err) => Err(ShoplistError::FailedToProcess(err)),
    }
}

/// Like [`visible_roster`], additionally requiring `caller` to own the list.
pub(crate) fn owned_roster<R: ListRepository + ?Sized>(
    lists: &R,
    caller: CollaboratorId,
    list_id: ListId,
) -> Result<Roster, ShoplistError> {
    let roster = visible_roster(lists, caller, list_id)?;
    if !roster.is_owner(caller) {
        return Err(ShoplistError::NotOwner(list_id));
    }
    Ok(roster)
}

pub(crate) fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
