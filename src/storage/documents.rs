//! Typed collection access over a [`KeyValueStore`].
//!
//! Reads deserialize a whole collection; writes upsert in memory and
//! serialize the whole collection back. An absent key reads as an empty
//! collection, a document that fails to parse is reported as
//! [`Error::CorruptDocument`] and backend failures as
//! [`Error::StorageUnavailable`].

use super::{KeyValueStore, Keyed, MemoryStore, keys, seed};
use crate::errors::{Error, Result};
use crate::models::{
    FuelRequest, FuelStation, Notification, PerformanceMetrics, SystemMetrics, User, UserMetrics,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument};

/// Typed handle on the persisted collections and session slots.
pub struct DocumentStore {
    backend: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

/// Content of the remember-me slot.
///
/// Tokens written by this crate carry the id of the user who logged in.
/// Older stores hold a bare token string; those read back with `user_id: None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RememberToken {
    /// Opaque random value
    pub token: String,
    /// User the token was issued to
    #[serde(default)]
    pub user_id: Option<String>,
    /// When the token was minted
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub issued_at: Option<DateTime<Utc>>,
}

/// Partial update for [`SystemMetrics`]; present sections replace stored ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsPatch {
    /// Replacement performance section
    pub performance_metrics: Option<PerformanceMetrics>,
    /// Replacement user section
    pub user_metrics: Option<UserMetrics>,
}

/// Which collections [`DocumentStore::initialize_storage`] wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Keys that were absent and have been seeded
    pub seeded: Vec<&'static str>,
}

impl SeedReport {
    /// True when every collection already existed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty()
    }
}

impl DocumentStore {
    /// Wraps a key/value backend.
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// A store backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    // ---- raw document access ----

    async fn read_document<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| Error::CorruptDocument {
                key: key.to_string(),
                source,
            })
    }

    async fn write_document<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw).await
    }

    async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.read_document(key).await?.unwrap_or_default())
    }

    async fn upsert<T>(&self, key: &str, item: T) -> Result<()>
    where
        T: Keyed + Serialize + DeserializeOwned,
    {
        let mut items: Vec<T> = self.read_collection(key).await?;
        if let Some(slot) = items.iter_mut().find(|existing| existing.id() == item.id()) {
            *slot = item;
        } else {
            items.push(item);
        }
        self.write_document(key, &items).await
    }

    // ---- users ----

    /// All users, in stored order.
    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.read_collection(keys::USERS).await
    }

    /// The user with `id`, if any.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.get_users().await?.into_iter().find(|u| u.id == id))
    }

    /// Replaces the user with the same id, or appends it.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn save_user(&self, user: User) -> Result<()> {
        self.upsert(keys::USERS, user).await
    }

    // ---- stations ----

    /// All stations, in stored order.
    pub async fn get_stations(&self) -> Result<Vec<FuelStation>> {
        self.read_collection(keys::STATIONS).await
    }

    /// The station with `id`, if any.
    pub async fn get_station_by_id(&self, id: i64) -> Result<Option<FuelStation>> {
        Ok(self.get_stations().await?.into_iter().find(|s| s.id == id))
    }

    /// Replaces the station with the same id, or appends it.
    #[instrument(skip(self, station), fields(station_id = station.id))]
    pub async fn save_station(&self, station: FuelStation) -> Result<()> {
        self.upsert(keys::STATIONS, station).await
    }

    // ---- requests ----

    /// All fuel requests, in creation order.
    pub async fn get_requests(&self) -> Result<Vec<FuelRequest>> {
        self.read_collection(keys::REQUESTS).await
    }

    /// The request with `id`, if any.
    pub async fn get_request_by_id(&self, id: &str) -> Result<Option<FuelRequest>> {
        Ok(self.get_requests().await?.into_iter().find(|r| r.id == id))
    }

    /// Replaces the request with the same id, or appends it.
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    pub async fn save_request(&self, request: FuelRequest) -> Result<()> {
        self.upsert(keys::REQUESTS, request).await
    }

    // ---- notifications ----

    /// Notifications addressed to `user_id`, oldest first.
    pub async fn get_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        Ok(self
            .read_collection::<Notification>(keys::NOTIFICATIONS)
            .await?
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect())
    }

    /// Appends a new notification, or replaces one with the same id.
    #[instrument(skip(self, notification), fields(notification_id = %notification.id))]
    pub async fn save_notification(&self, notification: Notification) -> Result<()> {
        self.upsert(keys::NOTIFICATIONS, notification).await
    }

    // ---- session slots ----

    /// Stores a full copy of `user` as the current session.
    pub async fn set_session(&self, user: &User) -> Result<()> {
        self.write_document(keys::SESSION, user).await
    }

    /// The current session user snapshot, if any.
    pub async fn get_session(&self) -> Result<Option<User>> {
        self.read_document(keys::SESSION).await
    }

    /// Clears both the session and the remember-token slots.
    pub async fn clear_session(&self) -> Result<()> {
        self.backend.remove(keys::SESSION).await?;
        self.backend.remove(keys::REMEMBER_TOKEN).await
    }

    /// Stores the remember-me token.
    pub async fn set_remember_token(&self, token: &RememberToken) -> Result<()> {
        self.write_document(keys::REMEMBER_TOKEN, token).await
    }

    /// The remember-me token, if any. Bare legacy strings read back without a user id.
    pub async fn get_remember_token(&self) -> Result<Option<RememberToken>> {
        let Some(raw) = self.backend.get(keys::REMEMBER_TOKEN).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<RememberToken>(&raw) {
            Ok(token) => Ok(Some(token)),
            Err(_) => {
                debug!("Remember token is not structured, reading it as a legacy token");
                Ok(Some(RememberToken {
                    token: raw.trim_matches('"').to_string(),
                    user_id: None,
                    issued_at: None,
                }))
            }
        }
    }

    // ---- system metrics ----

    /// Stored metrics, or empty metrics when none were ever written.
    pub async fn get_system_metrics(&self) -> Result<SystemMetrics> {
        Ok(self
            .read_document(keys::SYSTEM_METRICS)
            .await?
            .unwrap_or_default())
    }

    /// Merges `patch` over the stored metrics at section level.
    pub async fn update_system_metrics(&self, patch: MetricsPatch) -> Result<SystemMetrics> {
        let mut metrics = self.get_system_metrics().await?;
        if let Some(performance) = patch.performance_metrics {
            metrics.performance_metrics = performance;
        }
        if let Some(user) = patch.user_metrics {
            metrics.user_metrics = user;
        }
        self.write_document(keys::SYSTEM_METRICS, &metrics).await?;
        Ok(metrics)
    }

    // ---- bootstrap ----

    /// Seeds every absent collection with sample data.
    ///
    /// Collections that already exist are left untouched: nothing is merged
    /// and no schema upgrade happens, so repeated calls are no-ops.
    #[instrument(skip(self))]
    pub async fn initialize_storage(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();
        let data = seed::SeedData::generate();

        if self.seed_if_absent(keys::USERS, &data.users).await? {
            report.seeded.push(keys::USERS);
        }
        if self.seed_if_absent(keys::STATIONS, &data.stations).await? {
            report.seeded.push(keys::STATIONS);
        }
        if self.seed_if_absent(keys::REQUESTS, &data.requests).await? {
            report.seeded.push(keys::REQUESTS);
        }
        if self
            .seed_if_absent(keys::NOTIFICATIONS, &Vec::<Notification>::new())
            .await?
        {
            report.seeded.push(keys::NOTIFICATIONS);
        }
        if self
            .seed_if_absent(keys::SYSTEM_METRICS, &SystemMetrics::default())
            .await?
        {
            report.seeded.push(keys::SYSTEM_METRICS);
        }

        if report.is_empty() {
            debug!("All collections already present, nothing seeded");
        } else {
            info!("Seeded collections: {:?}", report.seeded);
        }
        Ok(report)
    }

    async fn seed_if_absent<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<bool> {
        if self.backend.get(key).await?.is_some() {
            return Ok(false);
        }
        self.write_document(key, value).await?;
        Ok(true)
    }

    /// Reads the raw text of a document, for diagnostics and tests.
    pub async fn raw_document(&self, key: &str) -> Result<Option<String>> {
        self.backend.get(key).await
    }

    /// Replaces the raw text of a document, bypassing serialization.
    pub async fn write_raw_document(&self, key: &str, raw: &str) -> Result<()> {
        self.backend.set(key, raw.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{FailingStore, sample_station, sample_user};

    #[tokio::test]
    async fn test_uninitialized_collections_read_empty() -> Result<()> {
        let store = DocumentStore::in_memory();
        assert!(store.get_users().await?.is_empty());
        assert!(store.get_stations().await?.is_empty());
        assert!(store.get_requests().await?.is_empty());
        assert!(store.get_notifications("anyone").await?.is_empty());
        assert_eq!(store.get_system_metrics().await?, SystemMetrics::default());
        assert!(store.get_session().await?.is_none());
        assert!(store.get_remember_token().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_user_upserts_by_id() -> Result<()> {
        let store = DocumentStore::in_memory();
        let mut user = sample_user("u1", "priya", "pw");
        store.save_user(user.clone()).await?;
        store.save_user(sample_user("u2", "ravi", "pw")).await?;

        user.profile.full_name = "Priya S.".to_string();
        store.save_user(user).await?;

        let users = store.get_users().await?;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "u1");
        assert_eq!(users[0].profile.full_name, "Priya S.");
        assert_eq!(users[1].id, "u2");
        Ok(())
    }

    #[tokio::test]
    async fn test_save_station_upserts_by_id() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.save_station(sample_station(1, 100.0)).await?;
        store.save_station(sample_station(2, 90.0)).await?;
        store.save_station(sample_station(1, 105.0)).await?;

        let stations = store.get_stations().await?;
        assert_eq!(stations.len(), 2);
        let first = store.get_station_by_id(1).await?.unwrap();
        assert_eq!(first.inventory.values().next().unwrap().price, 105.0);
        assert!(store.get_station_by_id(3).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() -> Result<()> {
        let memory = MemoryStore::new();
        memory.set(keys::USERS, "{not json".to_string()).await?;
        let store = DocumentStore::new(memory);

        let result = store.get_users().await;
        assert!(matches!(
            result,
            Err(Error::CorruptDocument { ref key, .. }) if key == keys::USERS
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_backend_failure_is_storage_unavailable() {
        let store = DocumentStore::new(FailingStore);
        assert!(matches!(
            store.get_requests().await,
            Err(Error::StorageUnavailable { .. })
        ));
        assert!(matches!(
            store.initialize_storage().await,
            Err(Error::StorageUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_slot_holds_snapshot() -> Result<()> {
        let store = DocumentStore::in_memory();
        let user = sample_user("u1", "priya", "pw");
        store.save_user(user.clone()).await?;
        store.set_session(&user).await?;

        let mut edited = user.clone();
        edited.profile.full_name = "Changed".to_string();
        store.save_user(edited).await?;

        let session = store.get_session().await?.unwrap();
        assert_eq!(session.profile.full_name, user.profile.full_name);
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_session_clears_both_slots() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.set_session(&sample_user("u1", "priya", "pw")).await?;
        store
            .set_remember_token(&RememberToken {
                token: "t".to_string(),
                user_id: Some("u1".to_string()),
                issued_at: None,
            })
            .await?;

        store.clear_session().await?;
        assert!(store.get_session().await?.is_none());
        assert!(store.get_remember_token().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_legacy_remember_token_reads_without_user() -> Result<()> {
        let memory = MemoryStore::new();
        memory
            .set(keys::REMEMBER_TOKEN, "V1StGXR8_Z5jdHi6B-myT".to_string())
            .await?;
        let store = DocumentStore::new(memory);

        let token = store.get_remember_token().await?.unwrap();
        assert_eq!(token.token, "V1StGXR8_Z5jdHi6B-myT");
        assert_eq!(token.user_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_notifications_filtered_by_user() -> Result<()> {
        let store = DocumentStore::in_memory();
        for (id, user) in [("n1", "u1"), ("n2", "u2"), ("n3", "u1")] {
            store
                .save_notification(Notification {
                    id: id.to_string(),
                    user_id: user.to_string(),
                    title: "t".to_string(),
                    message: "m".to_string(),
                    kind: crate::models::NotificationKind::Info,
                    read: false,
                    timestamp: Utc::now(),
                })
                .await?;
        }

        let mine = store.get_notifications("u1").await?;
        assert_eq!(
            mine.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            vec!["n1", "n3"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_system_metrics_merges_sections() -> Result<()> {
        let store = DocumentStore::in_memory();
        store
            .update_system_metrics(MetricsPatch {
                performance_metrics: Some(PerformanceMetrics {
                    load_time: vec![120.0],
                    response_time: vec![80.0],
                    error_rate: 1.5,
                }),
                user_metrics: None,
            })
            .await?;
        let merged = store
            .update_system_metrics(MetricsPatch {
                performance_metrics: None,
                user_metrics: Some(UserMetrics {
                    active_users: 3,
                    ..UserMetrics::default()
                }),
            })
            .await?;

        assert_eq!(merged.performance_metrics.load_time, vec![120.0]);
        assert_eq!(merged.user_metrics.active_users, 3);
        assert_eq!(store.get_system_metrics().await?, merged);
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_storage_seeds_all_collections() -> Result<()> {
        let store = DocumentStore::in_memory();
        let report = store.initialize_storage().await?;
        assert_eq!(report.seeded.len(), 5);

        assert!(!store.get_users().await?.is_empty());
        assert!(!store.get_stations().await?.is_empty());
        assert_eq!(store.get_requests().await?.len(), 1);
        assert!(store.raw_document(keys::NOTIFICATIONS).await?.is_some());
        assert!(store.raw_document(keys::SYSTEM_METRICS).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_storage_is_idempotent() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.initialize_storage().await?;

        let collection_keys = [
            keys::USERS,
            keys::STATIONS,
            keys::REQUESTS,
            keys::NOTIFICATIONS,
            keys::SYSTEM_METRICS,
        ];
        let mut before = Vec::new();
        for key in collection_keys {
            before.push(store.raw_document(key).await?);
        }

        let report = store.initialize_storage().await?;
        assert!(report.is_empty());

        for (key, snapshot) in collection_keys.iter().zip(before) {
            assert_eq!(store.raw_document(key).await?, snapshot);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_storage_leaves_existing_collection_alone() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.save_user(sample_user("only", "solo", "pw")).await?;

        let report = store.initialize_storage().await?;
        assert!(!report.seeded.contains(&keys::USERS));

        let users = store.get_users().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "only");
        Ok(())
    }
}
