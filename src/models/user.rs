//! User entity - accounts, profiles and registered vehicles.

use super::{FuelType, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Account role. Selects which view set a session may open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Back-office administrator
    #[serde(rename = "admin")]
    Admin,
    /// Customer ordering deliveries
    #[serde(rename = "user", alias = "customer")]
    Customer,
    /// Operator of a single fuel station
    #[serde(rename = "station")]
    StationOperator,
}

impl Role {
    /// Canonical name as stored in documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "user",
            Self::StationOperator => "station",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "customer" | "user" => Ok(Self::Customer),
            "station" | "station-operator" => Ok(Self::StationOperator),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// A registered account. Passwords are stored and compared in clear text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Login name
    pub username: String,
    /// Clear-text password
    pub password: String,
    /// Account role
    pub role: Role,
    /// Contact details, vehicles and preferences
    pub profile: UserProfile,
    /// Favourite station ids
    #[serde(default)]
    pub favorites: Vec<i64>,
    /// When the account was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When the account last logged in
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_login: DateTime<Utc>,
    /// Disabled accounts cannot log in
    pub is_active: bool,
}

impl User {
    /// Looks up one of the user's registered vehicles.
    #[must_use]
    pub fn vehicle(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.profile.vehicles.iter().find(|v| v.id == vehicle_id)
    }
}

/// Personal details attached to a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Vehicles the user orders fuel for
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    /// Ordering preferences
    pub preferences: UserPreferences,
}

/// A vehicle registered on a customer profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Unique identifier
    pub id: String,
    /// Body type (car, SUV, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Make and model
    pub model: String,
    /// Registration plate
    pub registration_number: String,
    /// Fuel the vehicle burns
    pub fuel_type: FuelType,
    /// Tank size in litres
    pub tank_capacity: f64,
}

/// Ordering defaults for a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Whether in-app notifications are shown
    pub notifications_enabled: bool,
    /// Percentage of tank below which a low fuel warning is raised
    pub low_fuel_warning_threshold: f64,
    /// Default fuel type on new requests
    pub preferred_fuel_type: FuelType,
    /// Default payment method on new requests
    pub preferred_payment_method: PaymentMethod,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            low_fuel_warning_threshold: 20.0,
            preferred_fuel_type: FuelType::Petrol,
            preferred_payment_method: PaymentMethod::Upi,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_customer_role_stored_as_user() {
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::Customer);
        assert_eq!(serde_json::from_str::<Role>("\"customer\"").unwrap(), Role::Customer);
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"user\"");
        assert_eq!(Role::Customer.to_string(), "user");
        assert_eq!(
            serde_json::from_str::<Role>("\"station\"").unwrap(),
            Role::StationOperator
        );
    }

    #[test]
    fn test_unknown_role_is_rejected_at_parse_time() {
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_reads_millisecond_timestamps_and_missing_favorites() {
        let json = r#"{
            "id": "u1",
            "username": "priya",
            "password": "secret",
            "role": "user",
            "profile": {
                "fullName": "Priya Sharma",
                "email": "priya@example.com",
                "phone": "+91 9876543211",
                "preferences": {
                    "notificationsEnabled": true,
                    "lowFuelWarningThreshold": 25,
                    "preferredFuelType": "Petrol",
                    "preferredPaymentMethod": "UPI"
                }
            },
            "createdAt": 1700000000000,
            "lastLogin": 1700000500000,
            "isActive": true
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(user.favorites.is_empty());
        assert!(user.profile.vehicles.is_empty());
        assert_eq!(user.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(user.last_login.timestamp_millis(), 1_700_000_500_000);
    }
}
