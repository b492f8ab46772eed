//! Domain entities - the typed shapes stored in the document collections.
//!
//! These are plain data contracts with no behaviour beyond small lookups.
//! Field names serialize in camelCase and timestamps as epoch milliseconds,
//! matching the layout of documents already present in a store.

pub mod metrics;
pub mod notification;
pub mod request;
pub mod station;
pub mod user;

pub use metrics::{PerformanceMetrics, SystemMetrics, SystemStats, UserMetrics};
pub use notification::{Notification, NotificationKind};
pub use request::{FuelRequest, RequestStatus, UrgencyLevel, UserLocation};
pub use station::{FuelStation, FuelStock, Location, OperatingHours, Review, ServiceType};
pub use user::{Role, User, UserPreferences, UserProfile, Vehicle};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Fuel grades a station can stock and a vehicle can burn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelType {
    /// Petrol / gasoline
    Petrol,
    /// Diesel
    Diesel,
    /// Compressed natural gas
    #[serde(rename = "CNG")]
    Cng,
}

impl FuelType {
    /// Every fuel type, in display order
    pub const ALL: [Self; 3] = [Self::Petrol, Self::Diesel, Self::Cng];

    /// Canonical name as stored in documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Cng => "CNG",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "petrol" => Ok(Self::Petrol),
            "diesel" => Ok(Self::Diesel),
            "cng" => Ok(Self::Cng),
            other => Err(format!("unknown fuel type '{other}'")),
        }
    }
}

/// How the customer intends to pay for a delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Unified Payments Interface
    #[serde(rename = "UPI")]
    Upi,
    /// Debit or credit card
    Card,
    /// Cash on delivery
    Cash,
    /// Prepaid wallet
    Wallet,
}

impl PaymentMethod {
    /// Canonical name as stored in documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "card",
            Self::Cash => "cash",
            Self::Wallet => "wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            "wallet" => Ok(Self::Wallet),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}
