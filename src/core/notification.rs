//! Notifications - in-app messages and the outward request notifier.
//!
//! In-app notifications live in the notifications collection and are read
//! per user. The outward notifier hands a templated summary of each new fuel
//! request to an external messaging channel; callers treat it as
//! fire-and-forget and never roll back on its failure.

use crate::{
    core::timestamp_now,
    errors::{Error, Result},
    models::{FuelType, Notification, NotificationKind, PaymentMethod},
    storage::DocumentStore,
};
use async_trait::async_trait;
use std::fmt::Write;
use tracing::{info, instrument};
use uuid::Uuid;

/// What the outward channel is told about a new request.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSummary {
    /// Customer display name
    pub customer_name: String,
    /// Requested fuel
    pub fuel_type: FuelType,
    /// Requested litres
    pub quantity: f64,
    /// Delivery location (station address)
    pub location: String,
    /// Vehicle model and plate
    pub vehicle: String,
    /// How the customer pays
    pub payment_method: PaymentMethod,
    /// Station asked to deliver
    pub station_name: String,
}

/// Outward messaging collaborator for new fuel requests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hands `summary` to the external channel.
    async fn notify_new_request(&self, summary: &RequestSummary) -> Result<()>;
}

/// Notifier that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify_new_request(&self, _summary: &RequestSummary) -> Result<()> {
        Ok(())
    }
}

/// Builds a `wa.me` click-to-chat link carrying the request message and logs it.
#[derive(Debug, Clone)]
pub struct WhatsAppLinkNotifier {
    destination: String,
}

impl WhatsAppLinkNotifier {
    /// Messages go to `destination` (country code + number, digits only).
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `destination` is empty or not all digits.
    pub fn new(destination: impl Into<String>) -> Result<Self> {
        let destination = destination.into();
        if destination.is_empty() || !destination.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::Config {
                message: format!("Invalid notifier destination '{destination}'"),
            });
        }
        Ok(Self { destination })
    }

    /// The click-to-chat link for `summary`.
    pub fn message_link(&self, summary: &RequestSummary) -> Result<String> {
        let text = encode_uri_component(&format_request_message(summary)?)?;
        Ok(format!("https://wa.me/{}?text={text}", self.destination))
    }
}

#[async_trait]
impl Notifier for WhatsAppLinkNotifier {
    async fn notify_new_request(&self, summary: &RequestSummary) -> Result<()> {
        let link = self.message_link(summary)?;
        info!(destination = %self.destination, "New request message ready: {link}");
        Ok(())
    }
}

/// Human-readable message announcing a new request.
pub fn format_request_message(summary: &RequestSummary) -> Result<String> {
    let mut message = String::new();
    writeln!(message, "🛢️ *New Fuel Request*")?;
    writeln!(message)?;
    writeln!(message, "Customer: {}", summary.customer_name)?;
    writeln!(message, "Station: {}", summary.station_name)?;
    writeln!(message, "Fuel Type: {}", summary.fuel_type)?;
    writeln!(message, "Quantity: {}L", summary.quantity)?;
    writeln!(message, "Location: {}", summary.location)?;
    writeln!(message, "Vehicle: {}", summary.vehicle)?;
    writeln!(message, "Payment: {}", summary.payment_method)?;
    writeln!(message, "Status: Pending")?;
    writeln!(message)?;
    write!(
        message,
        "Thank you for using our service! We'll process your request shortly."
    )?;
    Ok(message)
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(input: &str) -> Result<String> {
    let mut encoded = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            write!(encoded, "%{byte:02X}")?;
        }
    }
    Ok(encoded)
}

/// Raises an in-app notification for `user_id`.
#[instrument(skip(store, title, message))]
pub async fn notify_user(
    store: &DocumentStore,
    user_id: &str,
    title: &str,
    message: &str,
    kind: NotificationKind,
) -> Result<Notification> {
    let notification = Notification {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind,
        read: false,
        timestamp: timestamp_now(),
    };
    store.save_notification(notification.clone()).await?;
    Ok(notification)
}

/// Notifications for `user_id`, newest first.
pub async fn notifications_for(store: &DocumentStore, user_id: &str) -> Result<Vec<Notification>> {
    let mut notifications = store.get_notifications(user_id).await?;
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(notifications)
}

/// Number of unread notifications for `user_id`.
pub async fn unread_count(store: &DocumentStore, user_id: &str) -> Result<usize> {
    Ok(store
        .get_notifications(user_id)
        .await?
        .iter()
        .filter(|n| !n.read)
        .count())
}

/// Flags one of `user_id`'s notifications as read.
///
/// # Errors
/// [`Error::NotificationNotFound`] if no such notification is addressed to the user.
pub async fn mark_notification_read(
    store: &DocumentStore,
    user_id: &str,
    notification_id: &str,
) -> Result<Notification> {
    let mut notification = store
        .get_notifications(user_id)
        .await?
        .into_iter()
        .find(|n| n.id == notification_id)
        .ok_or_else(|| Error::NotificationNotFound {
            id: notification_id.to_string(),
        })?;

    notification.read = true;
    store.save_notification(notification.clone()).await?;
    Ok(notification)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn summary() -> RequestSummary {
        RequestSummary {
            customer_name: "Priya Sharma".to_string(),
            fuel_type: FuelType::Petrol,
            quantity: 20.0,
            location: "123, SV Road, Andheri West".to_string(),
            vehicle: "Maruti Swift (MH-01-AB-1234)".to_string(),
            payment_method: PaymentMethod::Upi,
            station_name: "Indian Oil Station - Andheri".to_string(),
        }
    }

    #[test]
    fn test_format_request_message() {
        let message = format_request_message(&summary()).unwrap();
        assert!(message.contains("Customer: Priya Sharma"));
        assert!(message.contains("Fuel Type: Petrol"));
        assert!(message.contains("Quantity: 20L"));
        assert!(message.contains("Vehicle: Maruti Swift (MH-01-AB-1234)"));
        assert!(message.contains("Payment: UPI"));
        assert!(message.contains("Status: Pending"));
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a b").unwrap(), "a%20b");
        assert_eq!(encode_uri_component("x=1&y").unwrap(), "x%3D1%26y");
        assert_eq!(encode_uri_component("keep-_.!~*'()").unwrap(), "keep-_.!~*'()");
        assert_eq!(encode_uri_component("\n").unwrap(), "%0A");
        assert_eq!(encode_uri_component("₹").unwrap(), "%E2%82%B9");
    }

    #[test]
    fn test_message_link_targets_destination() {
        let notifier = WhatsAppLinkNotifier::new("919786350537").unwrap();
        let link = notifier.message_link(&summary()).unwrap();
        assert!(link.starts_with("https://wa.me/919786350537?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("Priya%20Sharma"));
    }

    #[test]
    fn test_invalid_destination_rejected() {
        assert!(matches!(
            WhatsAppLinkNotifier::new("+91 978"),
            Err(Error::Config { .. })
        ));
        assert!(WhatsAppLinkNotifier::new("").is_err());
    }

    #[tokio::test]
    async fn test_notify_and_mark_read() -> Result<()> {
        let store = DocumentStore::in_memory();
        let first = notify_user(&store, "u1", "Hello", "First", NotificationKind::Info).await?;
        notify_user(&store, "u1", "Hello", "Second", NotificationKind::Success).await?;
        notify_user(&store, "u2", "Hello", "Other", NotificationKind::Info).await?;

        assert_eq!(unread_count(&store, "u1").await?, 2);
        assert_eq!(notifications_for(&store, "u1").await?.len(), 2);

        let read = mark_notification_read(&store, "u1", &first.id).await?;
        assert!(read.read);
        assert_eq!(unread_count(&store, "u1").await?, 1);
        assert_eq!(notifications_for(&store, "u1").await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_of_someone_elses_notification() -> Result<()> {
        let store = DocumentStore::in_memory();
        let theirs = notify_user(&store, "u2", "Hi", "Private", NotificationKind::Info).await?;

        let result = mark_notification_read(&store, "u1", &theirs.id).await;
        assert!(matches!(result, Err(Error::NotificationNotFound { .. })));
        assert_eq!(unread_count(&store, "u2").await?, 1);
        Ok(())
    }
}
