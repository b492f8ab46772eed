//! Core business logic - framework-agnostic auth, request lifecycle,
//! administration and reporting over the document store.

/// Session/auth gate: login, logout, session restore
pub mod auth;
/// System metrics samples and health grading
pub mod metrics;
/// Role-gated view selection
pub mod navigation;
/// In-app notifications and the outward request notifier
pub mod notification;
/// Fuel request creation and status lifecycle
pub mod request;
/// Station inventory, pricing and reviews
pub mod station;
/// Derived aggregates: system stats, consumption, analytics
pub mod stats;
/// User administration: registration, activation, vehicles, favorites
pub mod user;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to whole milliseconds, the precision documents store.
///
/// Stamping with this keeps in-memory values equal to what reads back.
#[must_use]
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
