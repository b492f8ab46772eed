//! Sample data written by [`super::DocumentStore::initialize_storage`].
//!
//! Ids are generated fresh each time, so seeding only makes sense into an
//! empty collection.

use crate::models::{
    FuelRequest, FuelStation, FuelStock, FuelType, Location, OperatingHours, PaymentMethod,
    RequestStatus, Review, Role, ServiceType, UrgencyLevel, User, UserPreferences, UserProfile,
    Vehicle,
};
use chrono::Duration;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One coherent set of seed collections.
#[derive(Debug, Clone)]
pub struct SeedData {
    /// Admin, customer and station operator accounts
    pub users: Vec<User>,
    /// Two sample stations
    pub stations: Vec<FuelStation>,
    /// One pending request from the sample customer
    pub requests: Vec<FuelRequest>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn stock(available: f64, capacity: f64, price: f64, threshold: f64) -> FuelStock {
    FuelStock {
        available,
        capacity,
        price,
        threshold,
    }
}

impl SeedData {
    /// Builds the sample collections, stamped with the current time.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn generate() -> Self {
        let now = crate::core::timestamp_now();

        let vehicles = vec![
            Vehicle {
                id: new_id(),
                kind: "Car".to_string(),
                model: "Maruti Swift".to_string(),
                registration_number: "MH-01-AB-1234".to_string(),
                fuel_type: FuelType::Petrol,
                tank_capacity: 37.0,
            },
            Vehicle {
                id: new_id(),
                kind: "SUV".to_string(),
                model: "Tata Nexon".to_string(),
                registration_number: "MH-01-CD-5678".to_string(),
                fuel_type: FuelType::Diesel,
                tank_capacity: 44.0,
            },
        ];

        let admin = User {
            id: new_id(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
            profile: UserProfile {
                full_name: "Rajesh Kumar".to_string(),
                email: "admin@fueldelivery.com".to_string(),
                phone: "+91 9876543210".to_string(),
                vehicles: Vec::new(),
                preferences: UserPreferences::default(),
            },
            favorites: Vec::new(),
            created_at: now,
            last_login: now,
            is_active: true,
        };

        let customer = User {
            id: new_id(),
            username: "user".to_string(),
            password: "user123".to_string(),
            role: Role::Customer,
            profile: UserProfile {
                full_name: "Priya Sharma".to_string(),
                email: "priya@example.com".to_string(),
                phone: "+91 9876543211".to_string(),
                vehicles: vehicles.clone(),
                preferences: UserPreferences {
                    low_fuel_warning_threshold: 25.0,
                    ..UserPreferences::default()
                },
            },
            favorites: vec![1],
            created_at: now,
            last_login: now,
            is_active: true,
        };

        let operator = User {
            id: new_id(),
            username: "station".to_string(),
            password: "station123".to_string(),
            role: Role::StationOperator,
            profile: UserProfile {
                full_name: "Amit Patel".to_string(),
                email: "andheri@fueldelivery.com".to_string(),
                phone: "+91 9876543212".to_string(),
                vehicles: Vec::new(),
                preferences: UserPreferences::default(),
            },
            favorites: Vec::new(),
            created_at: now,
            last_login: now,
            is_active: true,
        };

        let andheri = FuelStation {
            id: 1,
            name: "Indian Oil Station - Andheri".to_string(),
            location: Location {
                address: "123, SV Road, Andheri West, Mumbai - 400058".to_string(),
                latitude: 19.1136,
                longitude: 72.8697,
            },
            inventory: BTreeMap::from([
                (FuelType::Petrol, stock(5000.0, 10000.0, 102.5, 1000.0)),
                (FuelType::Diesel, stock(3000.0, 8000.0, 89.8, 800.0)),
                (FuelType::Cng, stock(2000.0, 5000.0, 76.5, 500.0)),
            ]),
            operating_hours: OperatingHours {
                open: "06:00".to_string(),
                close: "23:00".to_string(),
            },
            services: vec![
                ServiceType::CarWash,
                ServiceType::AirCheck,
                ServiceType::OilChange,
                ServiceType::BatteryService,
            ],
            ratings: 4.5,
            reviews: vec![Review {
                id: new_id(),
                user_id: customer.id.clone(),
                rating: 4.5,
                comment: "Great service and always available".to_string(),
                timestamp: now - Duration::days(1),
            }],
            is_active: true,
            manager_id: operator.id.clone(),
        };

        let bandra = FuelStation {
            id: 2,
            name: "Bharat Petroleum - Bandra".to_string(),
            location: Location {
                address: "456, Linking Road, Bandra West, Mumbai - 400050".to_string(),
                latitude: 19.0596,
                longitude: 72.8295,
            },
            inventory: BTreeMap::from([
                (FuelType::Petrol, stock(4000.0, 8000.0, 102.3, 800.0)),
                (FuelType::Diesel, stock(2500.0, 6000.0, 89.6, 600.0)),
                (FuelType::Cng, stock(1500.0, 4000.0, 76.2, 400.0)),
            ]),
            operating_hours: OperatingHours {
                open: "05:00".to_string(),
                close: "00:00".to_string(),
            },
            services: vec![
                ServiceType::CarWash,
                ServiceType::TireService,
                ServiceType::MiniMart,
            ],
            ratings: 4.3,
            reviews: Vec::new(),
            is_active: true,
            manager_id: new_id(),
        };

        let quantity = 20.0;
        let placed = now - Duration::hours(1);
        let pending = FuelRequest {
            id: new_id(),
            user_id: customer.id.clone(),
            station_id: andheri.id,
            vehicle_id: vehicles[0].id.clone(),
            fuel_type: FuelType::Petrol,
            quantity,
            urgency_level: UrgencyLevel::Medium,
            status: RequestStatus::Pending,
            price: andheri
                .stock(FuelType::Petrol)
                .map_or(0.0, |s| s.price * quantity),
            created_at: placed,
            updated_at: placed,
            notes: "Need fuel by evening".to_string(),
            rating: None,
            review: None,
            payment_method: PaymentMethod::Upi,
            user_location: None,
        };

        Self {
            users: vec![admin, customer, operator],
            stations: vec![andheri, bandra],
            requests: vec![pending],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_seed_is_internally_consistent() {
        let data = SeedData::generate();

        let customer = data.users.iter().find(|u| u.role == Role::Customer).unwrap();
        let operator = data
            .users
            .iter()
            .find(|u| u.role == Role::StationOperator)
            .unwrap();
        assert!(data.users.iter().any(|u| u.role == Role::Admin));

        let request = &data.requests[0];
        assert_eq!(request.user_id, customer.id);
        assert!(customer.vehicle(&request.vehicle_id).is_some());

        let station = data
            .stations
            .iter()
            .find(|s| s.id == request.station_id)
            .unwrap();
        assert_eq!(station.manager_id, operator.id);
        assert_eq!(
            request.price,
            station.stock(request.fuel_type).unwrap().price * request.quantity
        );
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let data = SeedData::generate();
        let mut ids: Vec<&str> = data.users.iter().map(|u| u.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), data.users.len());
    }
}
