//! Entity module - `SeaORM` entity definitions for the backing database.
//! The document store keeps every collection as one row of a single
//! key/value table, so there is exactly one entity.

pub mod storage_entry;

pub use storage_entry::{
    Column as StorageEntryColumn, Entity as StorageEntry, Model as StorageEntryModel,
};
