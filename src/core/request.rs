//! Request lifecycle - creation, status transitions and ratings.

use crate::{
    core::{
        notification::{self, Notifier, RequestSummary},
        station, timestamp_now,
    },
    errors::{Error, Result},
    models::{
        FuelRequest, FuelType, NotificationKind, PaymentMethod, RequestStatus, UrgencyLevel,
        UserLocation,
    },
    storage::DocumentStore,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Which status changes are legal.
///
/// Pending may go to approved, rejected or (unless approval is required)
/// straight to fulfilled. Approved may go to fulfilled or rejected. Rejected
/// and fulfilled are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionPolicy {
    /// Forbid pending -> fulfilled
    pub require_approval: bool,
    /// Draw the delivered litres down from station inventory on fulfilment
    pub decrement_inventory_on_fulfil: bool,
}

impl TransitionPolicy {
    /// Whether `from -> to` is an edge of the state machine.
    #[must_use]
    pub const fn allows(self, from: RequestStatus, to: RequestStatus) -> bool {
        use RequestStatus::{Approved, Fulfilled, Pending, Rejected};
        match (from, to) {
            (Pending, Approved | Rejected) | (Approved, Fulfilled | Rejected) => true,
            (Pending, Fulfilled) => !self.require_approval,
            _ => false,
        }
    }
}

/// Everything a customer submits when ordering fuel.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFuelRequest {
    /// Ordering customer
    pub user_id: String,
    /// Station asked to deliver
    pub station_id: i64,
    /// Vehicle on the customer's profile
    pub vehicle_id: String,
    /// Requested fuel
    pub fuel_type: FuelType,
    /// Litres, finite and positive
    pub quantity: f64,
    /// How the customer pays
    pub payment_method: PaymentMethod,
    /// Advisory priority
    pub urgency_level: UrgencyLevel,
    /// Free text for the driver
    pub notes: String,
    /// Where the customer is, if shared
    pub user_location: Option<UserLocation>,
}

/// Validates and persists a new pending request, then tells `notifier`.
///
/// The price is the station's current unit price for the fuel times the
/// quantity, frozen at this moment. Notifier failure is logged and does not
/// undo the request.
///
/// # Errors
/// * [`Error::InvalidQuantity`] unless quantity is finite and positive
/// * [`Error::UserNotFound`], [`Error::StationNotFound`], [`Error::StationInactive`]
/// * [`Error::VehicleNotFound`] if the user has vehicles and none matches
/// * [`Error::FuelTypeUnavailable`] if the station does not stock the fuel
#[instrument(skip(store, notifier, new), fields(user_id = %new.user_id, station_id = new.station_id))]
pub async fn create_request(
    store: &DocumentStore,
    notifier: &dyn Notifier,
    new: NewFuelRequest,
) -> Result<FuelRequest> {
    if !new.quantity.is_finite() || new.quantity <= 0.0 {
        return Err(Error::InvalidQuantity {
            quantity: new.quantity,
        });
    }

    let user = store
        .get_user_by_id(&new.user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: new.user_id.clone(),
        })?;

    let station = station::get_station(store, new.station_id).await?;
    if !station.is_active {
        return Err(Error::StationInactive { id: station.id });
    }

    let vehicle = user.vehicle(&new.vehicle_id);
    if vehicle.is_none() && !user.profile.vehicles.is_empty() {
        return Err(Error::VehicleNotFound {
            id: new.vehicle_id.clone(),
        });
    }

    let unit_price = station
        .stock(new.fuel_type)
        .ok_or(Error::FuelTypeUnavailable {
            station_id: station.id,
            fuel_type: new.fuel_type,
        })?
        .price;

    let now = timestamp_now();
    let request = FuelRequest {
        id: Uuid::new_v4().to_string(),
        user_id: new.user_id,
        station_id: station.id,
        vehicle_id: new.vehicle_id,
        fuel_type: new.fuel_type,
        quantity: new.quantity,
        urgency_level: new.urgency_level,
        status: RequestStatus::Pending,
        price: unit_price * new.quantity,
        created_at: now,
        updated_at: now,
        notes: new.notes,
        rating: None,
        review: None,
        payment_method: new.payment_method,
        user_location: new.user_location,
    };
    store.save_request(request.clone()).await?;
    info!(
        "Created request {} for {}L of {} ({:.2})",
        request.id, request.quantity, request.fuel_type, request.price
    );

    let summary = RequestSummary {
        customer_name: user.profile.full_name.clone(),
        fuel_type: request.fuel_type,
        quantity: request.quantity,
        location: request
            .user_location
            .as_ref()
            .map_or_else(|| station.location.address.clone(), |l| l.address.clone()),
        vehicle: vehicle.map_or_else(
            || request.vehicle_id.clone(),
            |v| format!("{} ({})", v.model, v.registration_number),
        ),
        payment_method: request.payment_method,
        station_name: station.name.clone(),
    };
    if let Err(e) = notifier.notify_new_request(&summary).await {
        warn!("Could not send new request notification: {e}");
    }

    Ok(request)
}

/// The request with `request_id`.
pub async fn get_request(store: &DocumentStore, request_id: &str) -> Result<FuelRequest> {
    store
        .get_request_by_id(request_id)
        .await?
        .ok_or_else(|| Error::RequestNotFound {
            id: request_id.to_string(),
        })
}

/// Moves a request to `new_status`, touching only `status` and `updated_at`.
///
/// The owner gets an in-app notification when their preferences allow it.
///
/// # Errors
/// * [`Error::RequestNotFound`] for an unknown id
/// * [`Error::InvalidTransition`] if `policy` forbids the edge
#[instrument(skip(store))]
pub async fn update_status(
    store: &DocumentStore,
    request_id: &str,
    new_status: RequestStatus,
    policy: TransitionPolicy,
) -> Result<FuelRequest> {
    let mut request = get_request(store, request_id).await?;
    if !policy.allows(request.status, new_status) {
        return Err(Error::InvalidTransition {
            from: request.status,
            to: new_status,
        });
    }

    if new_status == RequestStatus::Fulfilled && policy.decrement_inventory_on_fulfil {
        let current = station::get_station(store, request.station_id).await?;
        let updated = station::draw_down(current, request.fuel_type, request.quantity)?;
        store.save_station(updated).await?;
        debug!(
            "Drew {}L of {} from station {}",
            request.quantity, request.fuel_type, request.station_id
        );
    }

    let previous = request.status;
    request.status = new_status;
    request.updated_at = timestamp_now();
    store.save_request(request.clone()).await?;
    info!("Request {request_id} moved from {previous} to {new_status}");

    if let Err(e) = notify_owner(store, &request).await {
        warn!("Request {request_id} updated but owner notification failed: {e}");
    }

    Ok(request)
}

/// In-app notice to the request owner, if they want notifications.
async fn notify_owner(store: &DocumentStore, request: &FuelRequest) -> Result<()> {
    let wants_notification = store
        .get_user_by_id(&request.user_id)
        .await?
        .is_some_and(|u| u.profile.preferences.notifications_enabled);
    if !wants_notification {
        return Ok(());
    }

    let kind = match request.status {
        RequestStatus::Rejected => NotificationKind::Warning,
        RequestStatus::Fulfilled => NotificationKind::Success,
        RequestStatus::Pending | RequestStatus::Approved => NotificationKind::Info,
    };
    notification::notify_user(
        store,
        &request.user_id,
        "Request updated",
        &format!(
            "Your {}L {} request is now {}",
            request.quantity, request.fuel_type, request.status
        ),
        kind,
    )
    .await?;
    Ok(())
}

/// Attaches a customer rating (and optional review) to a fulfilled request.
///
/// # Errors
/// [`Error::InvalidRating`] if the request is not fulfilled or `rating` is outside 1..=5.
pub async fn rate_request(
    store: &DocumentStore,
    request_id: &str,
    rating: u8,
    review: Option<String>,
) -> Result<FuelRequest> {
    if !(1..=5).contains(&rating) {
        return Err(Error::InvalidRating {
            message: format!("{rating} is outside 1-5"),
        });
    }

    let mut request = get_request(store, request_id).await?;
    if request.status != RequestStatus::Fulfilled {
        return Err(Error::InvalidRating {
            message: format!("request is {}, only fulfilled requests can be rated", request.status),
        });
    }

    request.rating = Some(rating);
    request.review = review.filter(|r| !r.trim().is_empty());
    request.updated_at = timestamp_now();
    store.save_request(request.clone()).await?;
    Ok(request)
}

/// A customer's requests, newest first.
pub async fn requests_for_user(store: &DocumentStore, user_id: &str) -> Result<Vec<FuelRequest>> {
    let mut requests: Vec<FuelRequest> = store
        .get_requests()
        .await?
        .into_iter()
        .filter(|r| r.user_id == user_id)
        .collect();
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(requests)
}

/// Requests addressed to a station, newest first.
pub async fn requests_for_station(
    store: &DocumentStore,
    station_id: i64,
) -> Result<Vec<FuelRequest>> {
    let mut requests: Vec<FuelRequest> = store
        .get_requests()
        .await?
        .into_iter()
        .filter(|r| r.station_id == station_id)
        .collect();
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(requests)
}
