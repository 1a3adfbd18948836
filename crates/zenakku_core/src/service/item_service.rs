//! Item use-case service.
//!
//! # Responsibility
//! - Provide add/list/retime/delete entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Log lines carry IDs and counts only, never timestamps or user input.

use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{ItemListQuery, ItemRepository, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use log::{info, warn};

/// Use-case service wrapper for item operations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new item holding `timestamp`.
    pub fn add_item(&self, timestamp: DateTime<Utc>) -> RepoResult<Item> {
        let item = Item::new(timestamp);
        self.repo.create_item(&item)?;
        info!("event=item_add module=item status=ok item_id={}", item.id);
        Ok(item)
    }

    /// Stores a new item stamped with the current time.
    pub fn add_item_now(&self) -> RepoResult<Item> {
        self.add_item(Utc::now())
    }

    /// Reassigns the timestamp of an existing item.
    ///
    /// Returns `RepoError::NotFound` when no item has `id`.
    pub fn set_timestamp(&self, id: ItemId, timestamp: DateTime<Utc>) -> RepoResult<Item> {
        let Some(mut item) = self.repo.get_item(id)? else {
            warn!("event=item_retime module=item status=error error_code=not_found item_id={id}");
            return Err(RepoError::NotFound(id));
        };

        item.timestamp = timestamp;
        self.repo.update_item(&item)?;
        info!("event=item_retime module=item status=ok item_id={id}");
        Ok(item)
    }

    /// Gets one item by ID, or `None` when it does not exist.
    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.get_item(id)
    }

    /// Lists items using range, order and pagination options.
    pub fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        self.repo.list_items(query)
    }

    /// Returns the number of stored items.
    pub fn count_items(&self) -> RepoResult<u64> {
        self.repo.count_items()
    }

    /// Permanently removes one item.
    pub fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.repo.delete_item(id)?;
        info!("event=item_delete module=item status=ok item_id={id}");
        Ok(())
    }

    /// Removes items in the given order.
    ///
    /// Stops at the first missing ID and returns `NotFound` for it; items
    /// before it stay deleted. Returns the number of deleted items.
    pub fn delete_items(&self, ids: &[ItemId]) -> RepoResult<usize> {
        for (deleted, id) in ids.iter().enumerate() {
            if let Err(err) = self.repo.delete_item(*id) {
                warn!(
                    "event=item_delete_batch module=item status=error deleted={deleted} requested={}",
                    ids.len()
                );
                return Err(err);
            }
        }
        info!(
            "event=item_delete_batch module=item status=ok deleted={}",
            ids.len()
        );
        Ok(ids.len())
    }
}
