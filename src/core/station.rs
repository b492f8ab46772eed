//! Station business logic - lookups, inventory, pricing and reviews.

use crate::{
    core::timestamp_now,
    errors::{Error, Result},
    models::{FuelStation, FuelStock, FuelType, Review},
    storage::DocumentStore,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// The station with `station_id`.
///
/// # Errors
/// [`Error::StationNotFound`] if it does not exist.
pub async fn get_station(store: &DocumentStore, station_id: i64) -> Result<FuelStation> {
    store
        .get_station_by_id(station_id)
        .await?
        .ok_or(Error::StationNotFound { id: station_id })
}

/// Stations currently accepting requests.
pub async fn get_active_stations(store: &DocumentStore) -> Result<Vec<FuelStation>> {
    Ok(store
        .get_stations()
        .await?
        .into_iter()
        .filter(|s| s.is_active)
        .collect())
}

/// The station managed by `manager_id`, if any.
pub async fn station_for_manager(
    store: &DocumentStore,
    manager_id: &str,
) -> Result<Option<FuelStation>> {
    Ok(store
        .get_stations()
        .await?
        .into_iter()
        .find(|s| s.manager_id == manager_id))
}

fn stock_mut(station: &mut FuelStation, fuel_type: FuelType) -> Result<&mut FuelStock> {
    let station_id = station.id;
    station
        .inventory
        .get_mut(&fuel_type)
        .ok_or(Error::FuelTypeUnavailable {
            station_id,
            fuel_type,
        })
}

/// Sets the unit price of one fuel type. Existing requests keep their price.
#[instrument(skip(store))]
pub async fn update_fuel_price(
    store: &DocumentStore,
    station_id: i64,
    fuel_type: FuelType,
    price: f64,
) -> Result<FuelStation> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidPrice { price });
    }

    let mut station = get_station(store, station_id).await?;
    stock_mut(&mut station, fuel_type)?.price = price;
    store.save_station(station.clone()).await?;

    info!("Station {station_id} {fuel_type} price set to {price:.2}");
    Ok(station)
}

/// Adds `litres` to one fuel type, capped at tank capacity.
#[instrument(skip(store))]
pub async fn restock_fuel(
    store: &DocumentStore,
    station_id: i64,
    fuel_type: FuelType,
    litres: f64,
) -> Result<FuelStation> {
    if !litres.is_finite() || litres <= 0.0 {
        return Err(Error::InvalidQuantity { quantity: litres });
    }

    let mut station = get_station(store, station_id).await?;
    let stock = stock_mut(&mut station, fuel_type)?;
    // Stock already above capacity is left as is.
    stock.available = (stock.available + litres).min(stock.capacity.max(stock.available));
    store.save_station(station.clone()).await?;
    Ok(station)
}

/// Removes `litres` of one fuel type from the station's available stock, floored at zero.
///
/// Returns the updated station without persisting it.
pub(crate) fn draw_down(
    mut station: FuelStation,
    fuel_type: FuelType,
    litres: f64,
) -> Result<FuelStation> {
    let station_id = station.id;
    let stock = stock_mut(&mut station, fuel_type)?;
    if litres > stock.available {
        warn!(
            "Station {station_id} delivered {litres}L of {fuel_type} with only {}L on hand",
            stock.available
        );
    }
    stock.available = (stock.available - litres).max(0.0);
    Ok(station)
}

/// Opens or closes a station for new requests.
pub async fn set_station_active(
    store: &DocumentStore,
    station_id: i64,
    active: bool,
) -> Result<FuelStation> {
    let mut station = get_station(store, station_id).await?;
    station.is_active = active;
    store.save_station(station.clone()).await?;
    Ok(station)
}

/// Records a review and recomputes the station's aggregate rating as the mean of all reviews.
///
/// # Errors
/// [`Error::InvalidRating`] unless `rating` lies in 1..=5.
pub async fn add_review(
    store: &DocumentStore,
    station_id: i64,
    user_id: &str,
    rating: f64,
    comment: &str,
) -> Result<FuelStation> {
    if !(1.0..=5.0).contains(&rating) {
        return Err(Error::InvalidRating {
            message: format!("{rating} is outside 1-5"),
        });
    }

    let mut station = get_station(store, station_id).await?;
    station.reviews.push(Review {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        rating,
        comment: comment.to_string(),
        timestamp: timestamp_now(),
    });
    station.ratings = average_rating(&station.reviews);
    store.save_station(station.clone()).await?;
    Ok(station)
}

/// Mean rating of `reviews`, 0 when empty.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = reviews.len() as f64;
    reviews.iter().map(|r| r.rating).sum::<f64>() / count
}
