//! `SQLite` key/value backend built on the `storage_entries` entity.

use super::KeyValueStore;
use crate::entities::{StorageEntry, storage_entry};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument};

/// Key/value storage in one `SQLite` table, one row per key.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an open connection. The `storage_entries` table must exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and creates the table if needed.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = crate::config::database::create_connection(database_url).await?;
        crate::config::database::create_tables(&db).await?;
        Ok(Self::new(db))
    }

    async fn find_entry(&self, key: &str) -> Result<Option<storage_entry::Model>> {
        StorageEntry::find()
            .filter(storage_entry::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.find_entry(key).await?.map(|entry| entry.value))
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<()> {
        let now = Utc::now().naive_utc();

        if let Some(entry) = self.find_entry(key).await? {
            let mut active_model: storage_entry::ActiveModel = entry.into();
            active_model.value = Set(value);
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_entry = storage_entry::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value),
                updated_at: Set(now),
                ..Default::default()
            };
            new_entry.insert(&self.db).await?;
        }

        debug!("Wrote document '{key}'");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        StorageEntry::delete_many()
            .filter(storage_entry::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
