//! Itembook Core - item model and persistence
//!
//! - **Item**: the single record type (title, description, creation time)
//! - **ItemDraft**: validated input for creating or updating an item
//! - **ItemStore**: the storage trait handlers are written against
//! - **SqliteItemStore**: SQLite-backed store with one transaction per mutation

pub mod item;
pub mod schema;
pub mod sqlite_store;
pub mod store;

pub use item::{Item, ItemDraft, ItemId, ValidationError, TITLE_MAX_LEN};
pub use schema::{Schema, SCHEMA_VERSION};
pub use sqlite_store::SqliteItemStore;
pub use store::{ItemStore, StoreError};
