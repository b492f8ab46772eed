//! Persisted document store.
//!
//! Collections are stored as whole JSON documents behind a plain key/value
//! seam ([`KeyValueStore`]). Every write is a full read-modify-write of one
//! document with no version check, so concurrent writers race and the last
//! write wins.

pub mod documents;
pub mod memory;
pub mod seed;
pub mod sqlite;

pub use documents::{DocumentStore, MetricsPatch, RememberToken, SeedReport};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::errors::Result;
use async_trait::async_trait;

/// Fixed document keys.
pub mod keys {
    /// User collection
    pub const USERS: &str = "fds_users";
    /// Station collection
    pub const STATIONS: &str = "fds_stations";
    /// Fuel request collection
    pub const REQUESTS: &str = "fds_requests";
    /// Notification collection
    pub const NOTIFICATIONS: &str = "fds_notifications";
    /// Current session user
    pub const SESSION: &str = "fds_session";
    /// Remember-me token
    pub const REMEMBER_TOKEN: &str = "fds_remember_token";
    /// System metrics samples
    pub const SYSTEM_METRICS: &str = "fds_system_metrics";
}

/// Raw string storage addressed by key.
///
/// `get` returns `Ok(None)` for an absent key; backend failures surface as
/// [`crate::errors::Error::StorageUnavailable`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Documents that upsert by id inside their collection.
pub trait Keyed {
    /// Identifier type
    type Id: PartialEq + ?Sized;

    /// The document's identifier
    fn id(&self) -> &Self::Id;
}

impl Keyed for crate::models::User {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyed for crate::models::FuelStation {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

impl Keyed for crate::models::FuelRequest {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyed for crate::models::Notification {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}
