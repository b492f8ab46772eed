//! Fuel request entity - a customer's order for a delivery.

use super::{FuelType, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A delivery order placed by a customer against a station.
///
/// `price` is frozen at creation time as unit price × quantity and is never
/// recomputed when the station price changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRequest {
    /// Unique identifier
    pub id: String,
    /// Customer who placed the request
    pub user_id: String,
    /// Station asked to deliver
    pub station_id: i64,
    /// Vehicle on the customer's profile
    pub vehicle_id: String,
    /// Requested fuel
    pub fuel_type: FuelType,
    /// Requested litres
    pub quantity: f64,
    /// Customer-declared priority, advisory only
    pub urgency_level: UrgencyLevel,
    /// Lifecycle state
    pub status: RequestStatus,
    /// Total price at submission time
    pub price: f64,
    /// When the request was placed
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When the request last changed
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    /// Free-text notes for the driver
    #[serde(default)]
    pub notes: String,
    /// Post-fulfilment rating (1-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Post-fulfilment review text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    /// How the customer pays
    pub payment_method: PaymentMethod,
    /// Where the customer was when ordering, if shared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_location: Option<UserLocation>,
}

/// Geolocation captured when the request was placed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Human-readable address
    pub address: String,
}

/// Lifecycle state of a fuel request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision
    Pending,
    /// Accepted, awaiting delivery
    Approved,
    /// Refused (terminal)
    Rejected,
    /// Delivered (terminal)
    Fulfilled,
}

impl RequestStatus {
    /// Every status, in lifecycle order
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Fulfilled];

    /// Terminal states accept no further transitions
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Fulfilled)
    }

    /// Canonical name as stored in documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Fulfilled => "fulfilled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "fulfilled" => Ok(Self::Fulfilled),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Customer-supplied priority tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    /// Whenever convenient
    Low,
    /// Same day
    #[default]
    Medium,
    /// Within a few hours
    High,
    /// As soon as possible
    Critical,
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        })
    }
}

impl FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown urgency level '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Fulfilled.is_terminal());
    }

    #[test]
    fn test_request_without_optional_fields_parses() {
        let json = r#"{
            "id": "r1",
            "userId": "u1",
            "stationId": 1,
            "vehicleId": "v1",
            "fuelType": "Petrol",
            "quantity": 20,
            "urgencyLevel": "medium",
            "status": "pending",
            "price": 2050,
            "createdAt": 1700000000000,
            "updatedAt": 1700000000000,
            "notes": "Need fuel by evening",
            "paymentMethod": "UPI"
        }"#;
        let request: FuelRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.rating, None);
        assert_eq!(request.user_location, None);

        let written = serde_json::to_string(&request).unwrap();
        assert!(!written.contains("rating"));
        assert!(written.contains("\"urgencyLevel\":\"medium\""));
    }
}
