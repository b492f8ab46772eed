//! Notifier destination loading from environment variables.
//!
//! `NOTIFY_DESTINATION` in the `.env` file (or the process environment)
//! overrides the destination configured in config.toml.

use super::settings::NotifierSettings;

/// Environment variable that overrides the notifier destination.
pub const DESTINATION_ENV: &str = "NOTIFY_DESTINATION";

/// Gets the destination phone number from the environment, if set and non-empty.
#[must_use]
pub fn destination_from_env() -> Option<String> {
    std::env::var(DESTINATION_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolves the effective destination: environment override first, then settings.
#[must_use]
pub fn resolve_destination(settings: &NotifierSettings) -> String {
    destination_from_env().unwrap_or_else(|| settings.destination.clone())
}
