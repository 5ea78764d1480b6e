//! Core domain logic for shared shopping lists.
//! This crate is the single source of truth for membership, ownership and
//! invitation invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ShareCodePolicy};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::departure::{plan_departure, Departure};
pub use model::share_code::{CodeGenerator, RandomCodeGenerator, SHARE_CODE_LEN};
pub use model::shoplist::{
    CollaboratorId, Item, ItemId, ListId, ListSummary, Member, Roster, ShareCode,
};
pub use repo::directory_repo::{DirectoryRepository, SqliteDirectoryRepository};
pub use repo::invite_repo::{InviteRepository, SqliteInviteRepository};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error::ShoplistError;
pub use service::invite_service::InviteService;
pub use service::item_service::ItemService;
pub use service::list_service::ListService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
