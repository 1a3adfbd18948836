//! Core domain logic for ZenAkku.
//! This crate owns the item record, its storage shape and its persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId, ItemValidationError};
pub use model::schema::{Column, ColumnType, Record, RecordSchema};
pub use repo::item_repo::{
    ItemListQuery, ItemRepository, RepoError, RepoResult, SqliteItemRepository, TimestampOrder,
};
pub use service::item_service::ItemService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
