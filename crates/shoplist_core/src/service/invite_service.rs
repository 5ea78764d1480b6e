//! Share-code issuance, revocation and redemption.
//!
//! # Responsibility
//! - Mint time-boxed 6-character codes bound to exactly one list.
//! - Revoke codes by expiring them immediately.
//! - Redeem codes into new memberships.
//!
//! # Invariants
//! - Only the list owner may issue, read or revoke the list's code.
//! - Issuing replaces the list's previous code.
//! - Redeeming does not consume the code.

use crate::config::ShareCodePolicy;
use crate::model::now_epoch_ms;
use crate::model::share_code::{is_well_formed, CodeGenerator, RandomCodeGenerator};
use crate::model::shoplist::{CollaboratorId, ListId, ShareCode};
use crate::repo::invite_repo::InviteRepository;
use crate::repo::list_repo::ListRepository;
use crate::repo::RepoError;
use crate::service::error::ShoplistError;
use crate::service::owned_roster;
use log::{debug, info, warn};

/// Invite code service facade.
pub struct InviteService<L, I, G = RandomCodeGenerator>
where
    L: ListRepository,
    I: InviteRepository,
    G: CodeGenerator,
{
    lists: L,
    invites: I,
    generator: G,
    policy: ShareCodePolicy,
}

impl<L: ListRepository, I: InviteRepository> InviteService<L, I> {
    /// Creates a service with random codes and the default policy.
    pub fn new(lists: L, invites: I) -> Self {
        Self {
            lists,
            invites,
            generator: RandomCodeGenerator,
            policy: ShareCodePolicy::default(),
        }
    }
}

impl<L, I, G> InviteService<L, I, G>
where
    L: ListRepository,
    I: InviteRepository,
    G: CodeGenerator,
{
    pub fn with_policy(mut self, policy: ShareCodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the candidate source.
    pub fn with_generator<H: CodeGenerator>(self, generator: H) -> InviteService<L, I, H> {
        InviteService {
            lists: self.lists,
            invites: self.invites,
            generator,
            policy: self.policy,
        }
    }

    /// Issues a fresh code for the list, superseding any previous one.
    ///
    /// Candidates that collide with another list's active code are discarded
    /// and regenerated, up to `ShareCodePolicy::max_attempts` times.
    pub fn request_share_code(
        &self,
        caller: CollaboratorId,
        list_id: ListId,
    ) -> Result<ShareCode, ShoplistError> {
        owned_roster(&self.lists, caller, list_id)?;

        let attempts = self.policy.max_attempts;
        for attempt in 1..=attempts {
            let candidate = self.generator.generate();
            let now = now_epoch_ms();
            let expires_at = now.saturating_add(self.policy.ttl_ms);

            let stored = self
                .invites
                .store_share_code(list_id, &candidate, now, expires_at)
                .map_err(|err| {
                    warn!(
                        "event=share_code_issue module=invite status=error list_id={list_id} error_code=failed_to_process error={err}"
                    );
                    ShoplistError::FailedToProcess(err)
                })?;
            if stored {
                info!(
                    "event=share_code_issue module=invite status=ok list_id={list_id} attempts={attempt} expires_at={expires_at}"
                );
                return Ok(ShareCode {
                    list_id,
                    code: candidate,
                    expires_at,
                });
            }
            debug!("event=share_code_issue module=invite status=retry list_id={list_id} attempt={attempt}");
        }

        warn!(
            "event=share_code_issue module=invite status=error list_id={list_id} error_code=code_conflict attempts={attempts}"
        );
        Err(ShoplistError::FailedToProcess(RepoError::CodeConflict {
            attempts,
        }))
    }

    /// Returns the list's active code, if any.
    pub fn current_share_code(
        &self,
        caller: CollaboratorId,
        list_id: ListId,
    ) -> Result<Option<ShareCode>, ShoplistError> {
        owned_roster(&self.lists, caller, list_id)?;
        self.invites
            .active_share_code(list_id, now_epoch_ms())
            .map_err(ShoplistError::FailedToProcess)
    }

    /// Expires the list's active code now. A list without an active code is
    /// left unchanged.
    pub fn revoke_share_code(
        &self,
        caller: CollaboratorId,
        list_id: ListId,
    ) -> Result<(), ShoplistError> {
        owned_roster(&self.lists, caller, list_id)?;
        let revoked = self
            .invites
            .revoke_share_code(list_id, now_epoch_ms())
            .map_err(ShoplistError::FailedToProcess)?;
        info!("event=share_code_revoke module=invite status=ok list_id={list_id} revoked={revoked}");
        Ok(())
    }

    /// Adds `caller` to the list bound to `code` and returns that list's id.
    pub fn join(&self, caller: CollaboratorId, code: &str) -> Result<ListId, ShoplistError> {
        if !is_well_formed(code) {
            return Err(ShoplistError::InvalidCode);
        }

        match self.invites.redeem_share_code(code, caller, now_epoch_ms()) {
            Ok(list_id) => {
                info!("event=list_join module=invite status=ok list_id={list_id}");
                Ok(list_id)
            }
            Err(RepoError::CodeNotFound) => {
                debug!("event=list_join module=invite status=error error_code=invalid_code");
                Err(ShoplistError::InvalidCode)
            }
            Err(RepoError::DuplicateMembership { list_id, .. }) => {
                debug!("event=list_join module=invite status=error list_id={list_id} error_code=already_member");
                Err(ShoplistError::AlreadyMember(list_id))
            }
            Err(err) => {
                warn!("event=list_join module=invite status=error error_code=failed_to_process error={err}");
                Err(ShoplistError::FailedToProcess(err))
            }
        }
    }
}
