//! System metrics (persisted samples) and system stats (derived counts).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Performance and usage samples, written only by the metrics update hook.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    /// Latency samples and error rate
    #[serde(default)]
    pub performance_metrics: PerformanceMetrics,
    /// Session and action counters
    #[serde(default)]
    pub user_metrics: UserMetrics,
}

/// Rolling latency samples in milliseconds and an error-rate percentage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Page / command load times
    #[serde(default)]
    pub load_time: Vec<f64>,
    /// Store response times
    #[serde(default)]
    pub response_time: Vec<f64>,
    /// Percentage of failed operations
    #[serde(default)]
    pub error_rate: f64,
}

/// Usage counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    /// Users seen in the current window
    #[serde(default)]
    pub active_users: u64,
    /// Session durations in seconds
    #[serde(default)]
    pub session_duration: Vec<f64>,
    /// Per-action invocation counts
    #[serde(default)]
    pub action_counts: BTreeMap<String, u64>,
}

/// Headline counts for the admin overview. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    /// Users with `is_active == true`
    pub active_users: usize,
    /// Requests awaiting a decision
    pub pending_requests: usize,
    /// Requests delivered
    pub fulfilled_requests: usize,
    /// Stations on record
    pub total_stations: usize,
    /// Mean station rating, 0 when there are no stations
    pub average_rating: f64,
}
