//! Notification entity - in-app messages addressed to one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message shown to a single user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier
    pub id: String,
    /// Recipient
    pub user_id: String,
    /// Short heading
    pub title: String,
    /// Body text
    pub message: String,
    /// Severity / category
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Whether the recipient has seen it
    pub read: bool,
    /// When it was raised
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Severity / category of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// Needs attention
    Warning,
    /// Something completed
    Success,
    /// Something failed
    Error,
}
