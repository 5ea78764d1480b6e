//! Error taxonomy returned by every shared-list use-case.

use crate::model::shoplist::{ItemId, ListId};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service-level error.
///
/// `NotFound` covers both "no such list" and "caller is not a member"; the
/// two cases are deliberately indistinguishable to callers.
#[derive(Debug)]
pub enum ShoplistError {
    /// List name is blank after trim.
    InvalidName,
    /// Item label is blank after trim.
    InvalidLabel,
    /// List does not exist or is not visible to the caller.
    NotFound(ListId),
    /// The caller's membership disappeared while the operation was in flight.
    NotMember(ListId),
    /// Caller is a member but not the owner.
    NotOwner(ListId),
    /// Join code is malformed, unknown, expired or revoked.
    InvalidCode,
    /// Join code is valid but the caller already belongs to its list.
    AlreadyMember(ListId),
    /// Item does not exist on the list.
    ItemNotFound(ItemId),
    FailedToCreate(RepoError),
    FailedToUpdate(RepoError),
    FailedToProcess(RepoError),
}

impl ShoplistError {
    /// Stable machine-readable identifier of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::InvalidLabel => "invalid_label",
            Self::NotFound(_) => "not_found",
            Self::NotMember(_) => "not_member",
            Self::NotOwner(_) => "not_owner",
            Self::InvalidCode => "invalid_code",
            Self::AlreadyMember(_) => "already_member",
            Self::ItemNotFound(_) => "item_not_found",
            Self::FailedToCreate(_) => "failed_to_create",
            Self::FailedToUpdate(_) => "failed_to_update",
            Self::FailedToProcess(_) => "failed_to_process",
        }
    }
}

impl Display for ShoplistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "list name must not be blank"),
            Self::InvalidLabel => write!(f, "item label must not be blank"),
            Self::NotFound(id) => write!(f, "list not found: {id}"),
            Self::NotMember(id) => write!(f, "not a member of list {id}"),
            Self::NotOwner(id) => write!(f, "not the owner of list {id}"),
            Self::InvalidCode => write!(f, "invalid share code"),
            Self::AlreadyMember(id) => write!(f, "already a member of list {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::FailedToCreate(err) => write!(f, "failed to create: {err}"),
            Self::FailedToUpdate(err) => write!(f, "failed to update: {err}"),
            Self::FailedToProcess(err) => write!(f, "failed to process: {err}"),
        }
    }
}

impl Error for ShoplistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FailedToCreate(err) | Self::FailedToUpdate(err) | Self::FailedToProcess(err) => {
                Some(err)
            }
            _ => None,
        }
    }
}
