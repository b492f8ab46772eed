//! Application settings loading from config.toml
//!
//! Every section and field has a default, so a missing file or a partial
//! file still produces a complete [`Settings`].

use crate::core::request::TransitionPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default WhatsApp destination for new-request messages (country code + number).
pub const DEFAULT_NOTIFY_DESTINATION: &str = "919786350537";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Outward message channel
    #[serde(default)]
    pub notifier: NotifierSettings,
    /// Request lifecycle rules
    #[serde(default)]
    pub requests: RequestSettings,
    /// Metrics sampling
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// Document store bootstrap
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Outward notifier settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NotifierSettings {
    /// Phone number messages are addressed to
    #[serde(default = "default_destination")]
    pub destination: String,
    /// Set to false to skip outward messages entirely
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            enabled: true,
        }
    }
}

/// Request lifecycle settings
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RequestSettings {
    /// Forbid fulfilling a request that was never approved
    #[serde(default)]
    pub require_approval: bool,
    /// Subtract fulfilled quantity from the station's available stock
    #[serde(default)]
    pub decrement_inventory_on_fulfil: bool,
}

impl RequestSettings {
    /// The transition policy these settings describe
    #[must_use]
    pub const fn policy(self) -> TransitionPolicy {
        TransitionPolicy {
            require_approval: self.require_approval,
            decrement_inventory_on_fulfil: self.decrement_inventory_on_fulfil,
        }
    }
}

/// Metrics settings
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSettings {
    /// Number of most recent samples kept per series
    #[serde(default = "default_sample_window")]
    pub sample_window: usize,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            sample_window: default_sample_window(),
        }
    }
}

/// Storage bootstrap settings
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StorageSettings {
    /// Seed empty collections with sample data on start
    #[serde(default = "default_true")]
    pub seed_on_start: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { seed_on_start: true }
    }
}

fn default_destination() -> String {
    DEFAULT_NOTIFY_DESTINATION.to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_sample_window() -> usize {
    20
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `path`, falling back to defaults when the file is absent.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No {} found, using default settings", path.display());
        return Ok(Settings::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            [notifier]
            destination = "15550001111"
            enabled = false

            [requests]
            require_approval = true
            decrement_inventory_on_fulfil = true

            [metrics]
            sample_window = 5

            [storage]
            seed_on_start = false
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.notifier.destination, "15550001111");
        assert!(!settings.notifier.enabled);
        assert!(settings.requests.require_approval);
        assert!(settings.requests.decrement_inventory_on_fulfil);
        assert_eq!(settings.metrics.sample_window, 5);
        assert!(!settings.storage.seed_on_start);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings = toml::from_str("[requests]\nrequire_approval = true\n").unwrap();
        assert!(settings.requests.require_approval);
        assert!(!settings.requests.decrement_inventory_on_fulfil);
        assert_eq!(settings.notifier.destination, DEFAULT_NOTIFY_DESTINATION);
        assert!(settings.notifier.enabled);
        assert_eq!(settings.metrics.sample_window, 20);
        assert!(settings.storage.seed_on_start);
    }

    #[test]
    fn test_empty_file_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/fuel-delivery/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let settings = load_or_default("/nonexistent/fuel-delivery/config.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
