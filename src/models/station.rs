//! Fuel station entity - location, per-fuel inventory and reviews.

use super::FuelType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// A fuel station that fulfils delivery requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStation {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Street address and coordinates
    pub location: Location,
    /// Stock level and unit price per fuel type
    pub inventory: BTreeMap<FuelType, FuelStock>,
    /// Daily opening window
    pub operating_hours: OperatingHours,
    /// Extra services offered on site
    #[serde(default)]
    pub services: Vec<ServiceType>,
    /// Aggregate customer rating (0-5)
    pub ratings: f64,
    /// Individual customer reviews
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Inactive stations accept no new requests
    pub is_active: bool,
    /// User id of the station operator
    pub manager_id: String,
}

impl FuelStation {
    /// Inventory record for one fuel type, if stocked.
    #[must_use]
    pub fn stock(&self, fuel_type: FuelType) -> Option<&FuelStock> {
        self.inventory.get(&fuel_type)
    }

    /// Fuel types whose available volume has dropped under the reorder threshold.
    #[must_use]
    pub fn low_stock(&self) -> Vec<FuelType> {
        self.inventory
            .iter()
            .filter(|(_, stock)| stock.is_below_threshold())
            .map(|(fuel_type, _)| *fuel_type)
            .collect()
    }
}

/// Stock record for a single fuel type at a station.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelStock {
    /// Litres on hand
    pub available: f64,
    /// Tank capacity in litres
    pub capacity: f64,
    /// Unit price per litre
    pub price: f64,
    /// Reorder threshold in litres
    pub threshold: f64,
}

impl FuelStock {
    /// True when available volume is under the reorder threshold
    #[must_use]
    pub fn is_below_threshold(&self) -> bool {
        self.available < self.threshold
    }
}

/// Where a station is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Street address
    pub address: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Opening and closing time, `HH:MM` 24h strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatingHours {
    /// Opening time
    pub open: String,
    /// Closing time
    pub close: String,
}

/// A customer review left on a station.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique identifier
    pub id: String,
    /// Reviewer
    pub user_id: String,
    /// Star rating (1-5)
    pub rating: f64,
    /// Free-text comment
    pub comment: String,
    /// When the review was left
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// On-site services a station can advertise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    /// Car wash bay
    #[serde(rename = "Car Wash")]
    CarWash,
    /// Tyre repair and replacement
    #[serde(rename = "Tire Service")]
    TireService,
    /// Oil change
    #[serde(rename = "Oil Change")]
    OilChange,
    /// Battery check and replacement
    #[serde(rename = "Battery Service")]
    BatteryService,
    /// Tyre pressure check
    #[serde(rename = "Air Check")]
    AirCheck,
    /// Convenience store
    #[serde(rename = "Mini Mart")]
    MiniMart,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CarWash => "Car Wash",
            Self::TireService => "Tire Service",
            Self::OilChange => "Oil Change",
            Self::BatteryService => "Battery Service",
            Self::AirCheck => "Air Check",
            Self::MiniMart => "Mini Mart",
        };
        f.write_str(label)
    }
}
