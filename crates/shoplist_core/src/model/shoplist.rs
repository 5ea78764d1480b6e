//! List, roster and item read models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage identity of one shared list.
pub type ListId = i64;

/// Stable identifier of a collaborator, issued by the external identity store.
pub type CollaboratorId = Uuid;

/// Storage identity of one list entry.
pub type ItemId = i64;

/// One collaborator's access to a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub collaborator_id: CollaboratorId,
    /// Looked up from the collaborator directory; `None` when the directory
    /// has no entry for this id.
    pub display_name: Option<String>,
    /// Epoch ms at which the membership was created.
    pub joined_at: i64,
}

/// Consistent snapshot of a list's owner and collaborators.
///
/// `members` is ordered by `joined_at ASC, collaborator_id ASC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub list_id: ListId,
    pub name: String,
    pub owner_id: CollaboratorId,
    pub members: Vec<Member>,
}

impl Roster {
    /// Returns whether `collaborator_id` holds a membership on this list.
    pub fn contains(&self, collaborator_id: CollaboratorId) -> bool {
        self.members
            .iter()
            .any(|member| member.collaborator_id == collaborator_id)
    }

    pub fn is_owner(&self, collaborator_id: CollaboratorId) -> bool {
        self.owner_id == collaborator_id
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Display name for one member, if the member exists and has a name.
    pub fn display_name(&self, collaborator_id: CollaboratorId) -> Option<&str> {
        self.members
            .iter()
            .find(|member| member.collaborator_id == collaborator_id)
            .and_then(|member| member.display_name.as_deref())
    }

    /// Member ids in roster order.
    pub fn member_ids(&self) -> Vec<CollaboratorId> {
        self.members
            .iter()
            .map(|member| member.collaborator_id)
            .collect()
    }
}

/// Overview row for "lists I belong to".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub list_id: ListId,
    pub name: String,
    pub owner_id: CollaboratorId,
    pub member_count: u32,
}

/// One entry on a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub list_id: ListId,
    pub label: String,
    pub added_by: CollaboratorId,
    pub created_at: i64,
}

/// Active invitation code for one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCode {
    pub list_id: ListId,
    pub code: String,
    /// Epoch ms; the code is active while `now < expires_at`.
    pub expires_at: i64,
}

impl ShareCode {
    pub fn is_active_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }
}
