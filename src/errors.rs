//! Unified error types for the fuel delivery core.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants carry
//! enough context to render a user-facing message directly from `Display`.

use crate::models::{FuelType, RequestStatus, Role};
use thiserror::Error;

/// All errors produced by the storage layer, the auth gate and the request lifecycle.
#[derive(Debug, Error)]
pub enum Error {
    /// No user matched the supplied username and password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Credentials matched but the account is switched off
    #[error("Account '{username}' is disabled. Please contact administrator.")]
    AccountDisabled {
        /// Username of the disabled account
        username: String,
    },

    /// The command needs a logged-in session
    #[error("Not logged in. Run `login` first.")]
    NotLoggedIn,

    /// The session role may not run this command
    #[error("Role '{role}' is not allowed to do this")]
    Unauthorized {
        /// Role of the current session
        role: Role,
    },

    /// A command was invoked with missing or conflicting arguments
    #[error("Usage error: {message}")]
    Usage {
        /// What the caller must supply
        message: String,
    },

    /// No fuel request with this id exists
    #[error("Fuel request '{id}' not found")]
    RequestNotFound {
        /// Requested id
        id: String,
    },

    /// No user with this id exists
    #[error("User '{id}' not found")]
    UserNotFound {
        /// Requested id
        id: String,
    },

    /// No station with this id exists
    #[error("Station {id} not found")]
    StationNotFound {
        /// Requested id
        id: i64,
    },

    /// The station exists but is not taking requests
    #[error("Station {id} is not active")]
    StationInactive {
        /// Requested id
        id: i64,
    },

    /// No notification with this id is addressed to the user
    #[error("Notification '{id}' not found")]
    NotificationNotFound {
        /// Requested id
        id: String,
    },

    /// The vehicle is not registered on the requesting user's profile
    #[error("Vehicle '{id}' not found on user profile")]
    VehicleNotFound {
        /// Requested vehicle id
        id: String,
    },

    /// The station does not stock the requested fuel type
    #[error("Station {station_id} does not stock {fuel_type}")]
    FuelTypeUnavailable {
        /// Station that was asked
        station_id: i64,
        /// Fuel type that is missing from its inventory
        fuel_type: FuelType,
    },

    /// Quantity is zero, negative or not a finite number
    #[error("Invalid quantity: {quantity}. Quantity must be a positive number of litres")]
    InvalidQuantity {
        /// Rejected quantity
        quantity: f64,
    },

    /// Price is negative or not a finite number
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// Rejected price
        price: f64,
    },

    /// The status change is not an edge of the request state machine
    #[error("Cannot move request from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: RequestStatus,
        /// Requested status
        to: RequestStatus,
    },

    /// Ratings must lie between 1 and 5, and only fulfilled requests can be rated
    #[error("Invalid rating: {message}")]
    InvalidRating {
        /// Reason the rating was refused
        message: String,
    },

    /// A username is already taken
    #[error("Username '{username}' already exists")]
    DuplicateUsername {
        /// Conflicting username
        username: String,
    },

    /// The key/value backend could not be reached or failed the operation
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// Backend failure description
        message: String,
    },

    /// A stored document exists but cannot be parsed
    #[error("Stored document '{key}' is corrupt: {source}")]
    CorruptDocument {
        /// Storage key of the unreadable document
        key: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be serialized for writing
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The outward notifier failed to hand off a message
    #[error("Notification error: {message}")]
    Notification {
        /// Failure description
        message: String,
    },

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Failure description
        message: String,
    },

    /// Output formatting failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::StorageUnavailable {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
