//! Shared test utilities.
//!
//! Helpers for building stores and entities with sensible defaults, plus
//! fake collaborators (failing storage, recording notifier).

use crate::{
    core::{
        notification::{Notifier, RequestSummary},
        request::{self, NewFuelRequest},
        timestamp_now,
    },
    errors::{Error, Result},
    models::{
        FuelRequest, FuelStation, FuelStock, FuelType, Location, OperatingHours, PaymentMethod,
        Role, UrgencyLevel, User, UserPreferences, UserProfile, Vehicle,
    },
    storage::{DocumentStore, KeyValueStore},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A backend whose every call fails, for storage-unavailable paths.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(unavailable())
    }

    async fn set(&self, _key: &str, _value: String) -> Result<()> {
        Err(unavailable())
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(unavailable())
    }
}

fn unavailable() -> Error {
    Error::StorageUnavailable {
        message: "backend offline".to_string(),
    }
}

/// Notifier that remembers every summary it was handed.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    /// Summaries received, in order
    pub sent: Mutex<Vec<RequestSummary>>,
}

impl RecordingNotifier {
    /// Number of summaries received so far
    pub fn count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_new_request(&self, summary: &RequestSummary) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(summary.clone());
        }
        Ok(())
    }
}

/// Notifier that always fails.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify_new_request(&self, _summary: &RequestSummary) -> Result<()> {
        Err(Error::Notification {
            message: "channel unreachable".to_string(),
        })
    }
}

/// A test vehicle burning `fuel_type`.
pub fn sample_vehicle(id: &str, fuel_type: FuelType) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        kind: "Car".to_string(),
        model: "Maruti Swift".to_string(),
        registration_number: "MH-01-AB-1234".to_string(),
        fuel_type,
        tank_capacity: 37.0,
    }
}

/// An active customer with one petrol vehicle (`"{id}-car"`).
///
/// # Defaults
/// * `role`: customer
/// * `is_active`: true
pub fn sample_user(id: &str, username: &str, password: &str) -> User {
    let now = timestamp_now();
    User {
        id: id.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        role: Role::Customer,
        profile: UserProfile {
            full_name: format!("{username} test"),
            email: format!("{username}@example.com"),
            phone: "+91 9000000000".to_string(),
            vehicles: vec![sample_vehicle(&format!("{id}-car"), FuelType::Petrol)],
            preferences: UserPreferences::default(),
        },
        favorites: Vec::new(),
        created_at: now,
        last_login: now,
        is_active: true,
    }
}

/// A user with a specific role and activity flag.
pub fn user_with_role(id: &str, username: &str, role: Role, is_active: bool) -> User {
    User {
        role,
        is_active,
        ..sample_user(id, username, "pw")
    }
}

/// An active station stocking only petrol at `petrol_price`.
///
/// # Defaults
/// * available: 5000, capacity: 10000, threshold: 1000
/// * ratings: 4.0, no reviews
pub fn sample_station(id: i64, petrol_price: f64) -> FuelStation {
    FuelStation {
        id,
        name: format!("Station {id}"),
        location: Location {
            address: format!("{id} Test Road, Mumbai"),
            latitude: 19.0,
            longitude: 72.8,
        },
        inventory: BTreeMap::from([(
            FuelType::Petrol,
            FuelStock {
                available: 5000.0,
                capacity: 10000.0,
                price: petrol_price,
                threshold: 1000.0,
            },
        )]),
        operating_hours: OperatingHours {
            open: "06:00".to_string(),
            close: "23:00".to_string(),
        },
        services: Vec::new(),
        ratings: 4.0,
        reviews: Vec::new(),
        is_active: true,
        manager_id: format!("manager-{id}"),
    }
}

/// A petrol request from `user` for `quantity` litres at `station_id`.
pub fn new_request(user: &User, station_id: i64, quantity: f64) -> NewFuelRequest {
    NewFuelRequest {
        user_id: user.id.clone(),
        station_id,
        vehicle_id: user.profile.vehicles[0].id.clone(),
        fuel_type: FuelType::Petrol,
        quantity,
        payment_method: PaymentMethod::Upi,
        urgency_level: UrgencyLevel::Medium,
        notes: String::new(),
        user_location: None,
    }
}

/// An in-memory store with one customer (`u1`/`priya`/`pw`) and one station
/// (id 1, petrol at 100.0). Returns (store, customer, station).
pub async fn setup_with_customer_and_station() -> Result<(DocumentStore, User, FuelStation)> {
    let store = DocumentStore::in_memory();
    let user = sample_user("u1", "priya", "pw");
    let station = sample_station(1, 100.0);
    store.save_user(user.clone()).await?;
    store.save_station(station.clone()).await?;
    Ok((store, user, station))
}

/// Creates a pending request through the lifecycle with a silent notifier.
pub async fn create_test_request(
    store: &DocumentStore,
    user: &User,
    station_id: i64,
    quantity: f64,
) -> Result<FuelRequest> {
    request::create_request(
        store,
        &crate::core::notification::NoopNotifier,
        new_request(user, station_id, quantity),
    )
    .await
}
