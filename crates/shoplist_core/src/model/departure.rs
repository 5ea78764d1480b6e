//! Departure planning for a collaborator leaving a list.
//!
//! The plan is computed from one roster snapshot and then executed by the
//! repository inside the same transaction that produced the snapshot.

use crate::model::shoplist::{CollaboratorId, Roster};
use serde::{Deserialize, Serialize};

/// Outcome of a collaborator leaving a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Departure {
    /// The leaver was the last member; the list and everything bound to it
    /// is deleted.
    Dissolved,
    /// The owner left; ownership moved to `successor`.
    OwnershipTransferred { successor: CollaboratorId },
    /// A non-owner left; nothing else changed.
    Departed,
}

/// Decides what happens when `leaving` leaves the list described by `roster`.
///
/// Returns `None` when `leaving` is not a member. The successor is the
/// earliest-joined remaining member (roster order), never the leaver.
pub fn plan_departure(roster: &Roster, leaving: CollaboratorId) -> Option<Departure> {
    if !roster.contains(leaving) {
        return None;
    }

    let successor = roster
        .members
        .iter()
        .map(|member| member.collaborator_id)
        .find(|id| *id != leaving);

    match successor {
        None => Some(Departure::Dissolved),
        Some(successor) if roster.is_owner(leaving) => {
            Some(Departure::OwnershipTransferred { successor })
        }
        Some(_) => Some(Departure::Departed),
    }
}
