use crate::{
    config::{Settings, notifier::resolve_destination},
    core::notification::{NoopNotifier, Notifier, WhatsAppLinkNotifier},
    errors::Result,
    storage::DocumentStore,
};
use tracing::info;

/// Shared state available to every command.
pub struct AppContext {
    /// Persisted collections and session slots
    pub store: DocumentStore,
    /// Loaded settings
    pub settings: Settings,
    /// Outward channel for new requests
    pub notifier: Box<dyn Notifier>,
}

impl AppContext {
    /// Builds the context, choosing the notifier from `settings`.
    ///
    /// # Errors
    /// Returns an error if the notifier is enabled with an invalid destination.
    pub fn new(store: DocumentStore, settings: Settings) -> Result<Self> {
        let notifier: Box<dyn Notifier> = if settings.notifier.enabled {
            let destination = resolve_destination(&settings.notifier);
            info!("New requests will be announced to {destination}");
            Box::new(WhatsAppLinkNotifier::new(destination)?)
        } else {
            Box::new(NoopNotifier)
        };
        Ok(Self {
            store,
            settings,
            notifier,
        })
    }

    /// Builds the context around a caller-supplied notifier.
    pub fn with_notifier(
        store: DocumentStore,
        settings: Settings,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            store,
            settings,
            notifier: Box::new(notifier),
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
