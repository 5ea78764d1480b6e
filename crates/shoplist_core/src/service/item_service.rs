//! Membership-gated list entry use-cases.

use crate::model::shoplist::{CollaboratorId, Item, ItemId, ListId};
use crate::repo::item_repo::ItemRepository;
use crate::repo::list_repo::ListRepository;
use crate::repo::RepoError;
use crate::service::error::ShoplistError;
use crate::service::{normalize_text, visible_roster};

pub struct ItemService<L: ListRepository, I: ItemRepository> {
    lists: L,
    items: I,
}

impl<L: ListRepository, I: ItemRepository> ItemService<L, I> {
    pub fn new(lists: L, items: I) -> Self {
        Self { lists, items }
    }

    pub fn add_item(
        &self,
        caller: CollaboratorId,
        list_id: ListId,
        label: impl Into<String>,
    ) -> Result<Item, ShoplistError> {
        let label = normalize_text(&label.into()).ok_or(ShoplistError::InvalidLabel)?;
        visible_roster(&self.lists, caller, list_id)?;
        self.items
            .add_item(list_id, caller, &label)
            .map_err(ShoplistError::FailedToCreate)
    }

    pub fn list_items(
        &self,
        caller: CollaboratorId,
        list_id: ListId,
    ) -> Result<Vec<Item>, ShoplistError> {
        visible_roster(&self.lists, caller, list_id)?;
        self.items
            .list_items(list_id)
            .map_err(ShoplistError::FailedToProcess)
    }

    pub fn remove_item(
        &self,
        caller: CollaboratorId,
        list_id: ListId,
        item_id: ItemId,
    ) -> Result<(), ShoplistError> {
        visible_roster(&self.lists, caller, list_id)?;
        self.items
            .remove_item(list_id, item_id)
            .map_err(|err| match err {
                RepoError::ItemNotFound(id) => ShoplistError::ItemNotFound(id),
                other => ShoplistError::FailedToUpdate(other),
            })
    }
}
