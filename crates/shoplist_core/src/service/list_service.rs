//! List lifecycle and departure use-cases.
//!
//! # Responsibility
//! - Create lists with their owner as first member.
//! - Rename lists (owner only).
//! - Remove a collaborator, dissolving the list or handing over ownership.
//!
//! # Invariants
//! - A list's owner is always one of its members.
//! - Removing the last member deletes the list instead of leaving it empty.

use crate::model::departure::Departure;
use crate::model::shoplist::{CollaboratorId, ListId, ListSummary, Roster};
use crate::repo::list_repo::ListRepository;
use crate::repo::RepoError;
use crate::service::error::ShoplistError;
use crate::service::{normalize_text, owned_roster, visible_roster};
use log::{info, warn};

/// List lifecycle service facade.
pub struct ListService<R: ListRepository> {
    repo: R,
}

impl<R: ListRepository> ListService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns owner and members of a list, ungated.
    ///
    /// Intended for trusted callers; user-facing paths go through
    /// [`ListService::show_list`].
    pub fn get_membership(&self, list_id: ListId) -> Result<Roster, ShoplistError> {
        self.repo
            .load_roster(list_id)
            .map_err(ShoplistError::FailedToProcess)?
            .ok_or(ShoplistError::NotFound(list_id))
    }

    /// Returns the roster when `caller` is a member, `NotFound` otherwise.
    pub fn show_list(&self, caller: CollaboratorId, list_id: ListId) -> Result<Roster, ShoplistError> {
        visible_roster(&self.repo, caller, list_id)
    }

    /// Creates a list owned by `owner` with `owner` as its only member.
    pub fn create_list(
        &self,
        owner: CollaboratorId,
        name: impl Into<String>,
    ) -> Result<ListId, ShoplistError> {
        let name = normalize_text(&name.into()).ok_or(ShoplistError::InvalidName)?;
        match self.repo.create_list(owner, &name) {
            Ok(list_id) => {
                info!("event=list_create module=list status=ok list_id={list_id}");
                Ok(list_id)
            }
            Err(err) => {
                warn!("event=list_create module=list status=error error_code=failed_to_create error={err}");
                Err(ShoplistError::FailedToCreate(err))
            }
        }
    }

    /// Renames a list. Only the owner may rename.
    pub fn rename_list(
        &self,
        caller: CollaboratorId,
        list_id: ListId,
        new_name: impl Into<String>,
    ) -> Result<(), ShoplistError> {
        let name = normalize_text(&new_name.into()).ok_or(ShoplistError::InvalidName)?;
        owned_roster(&self.repo, caller, list_id)?;
        match self.repo.rename_list(list_id, caller, &name) {
            Ok(()) => {
                info!("event=list_rename module=list status=ok list_id={list_id}");
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=list_rename module=list status=error list_id={list_id} error_code=failed_to_update error={err}"
                );
                Err(ShoplistError::FailedToUpdate(err))
            }
        }
    }

    /// Removes `caller` from the list.
    ///
    /// - Last member: the list, its memberships, items and invite code are deleted.
    /// - Owner with others remaining: ownership moves to the earliest-joined
    ///   remaining member.
    /// - Anyone else: only the caller's membership is removed.
    pub fn leave(&self, caller: CollaboratorId, list_id: ListId) -> Result<Departure, ShoplistError> {
        visible_roster(&self.repo, caller, list_id)?;

        let departure = self.repo.depart(list_id, caller).map_err(|err| match err {
            RepoError::ListNotFound(id) => ShoplistError::NotFound(id),
            RepoError::NotMember { list_id, .. } => ShoplistError::NotMember(list_id),
            other => ShoplistError::FailedToProcess(other),
        });

        match &departure {
            Ok(Departure::Dissolved) => {
                info!("event=list_leave module=list status=ok list_id={list_id} outcome=dissolved");
            }
            Ok(Departure::OwnershipTransferred { .. }) => {
                info!("event=list_leave module=list status=ok list_id={list_id} outcome=ownership_transferred");
            }
            Ok(Departure::Departed) => {
                info!("event=list_leave module=list status=ok list_id={list_id} outcome=departed");
            }
            Err(err) => {
                warn!(
                    "event=list_leave module=list status=error list_id={list_id} error_code={} error={err}",
                    err.code()
                );
            }
        }
        departure
    }

    /// Lists every list `caller` belongs to.
    pub fn lists_for(&self, caller: CollaboratorId) -> Result<Vec<ListSummary>, ShoplistError> {
        self.repo
            .lists_for(caller)
            .map_err(ShoplistError::FailedToProcess)
    }
}
