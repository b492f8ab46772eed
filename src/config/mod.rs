/// Database configuration and connection management
pub mod database;

/// Outward notifier destination from environment variables
pub mod notifier;

/// Application settings loading from config.toml
pub mod settings;

pub use settings::{
    MetricsSettings, NotifierSettings, RequestSettings, Settings, StorageSettings,
    load_config, load_or_default,
};
