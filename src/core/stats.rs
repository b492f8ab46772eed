//! Derived aggregates.
//!
//! Everything here is computed on demand from full collection scans and never
//! persisted. Time windows take `now` from the caller so results can be
//! reproduced; production callers pass the current time, which means figures
//! drift as time passes even when the data does not change.

use crate::{
    core::station,
    errors::Result,
    models::{FuelRequest, FuelStation, FuelType, RequestStatus, SystemStats},
    storage::DocumentStore,
};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Months in the trailing consumption window.
pub const TRAILING_MONTHS: u32 = 6;

/// Longest per-month series [`monthly_consumption`] builds.
pub const MAX_SERIES_MONTHS: u32 = 120;

/// Headline counts across all collections.
pub async fn system_stats(store: &DocumentStore) -> Result<SystemStats> {
    let users = store.get_users().await?;
    let requests = store.get_requests().await?;
    let stations = store.get_stations().await?;

    let count_status =
        |status: RequestStatus| requests.iter().filter(|r| r.status == status).count();

    Ok(SystemStats {
        active_users: users.iter().filter(|u| u.is_active).count(),
        pending_requests: count_status(RequestStatus::Pending),
        fulfilled_requests: count_status(RequestStatus::Fulfilled),
        total_stations: stations.len(),
        average_rating: mean(stations.iter().map(|s| s.ratings)),
    })
}

/// A customer's fuel usage summary over fulfilled requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionStats {
    /// Sum of request prices
    pub total_spent: f64,
    /// Litres per month over the trailing six months
    pub monthly_average: f64,
    /// Litres since 1 January of the current year
    pub yearly_total: f64,
    /// `monthly_average * 12`
    pub projected_annual: f64,
    /// Number of fulfilled requests counted
    pub fulfilled_requests: usize,
}

/// Consumption stats for `user_id` as of `now`.
pub async fn user_consumption_stats(
    store: &DocumentStore,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<ConsumptionStats> {
    let requests = store.get_requests().await?;
    Ok(compute_consumption(
        requests.iter().filter(|r| r.user_id == user_id),
        now,
    ))
}

/// Consumption over whichever requests are given; only fulfilled ones count.
#[must_use]
pub fn compute_consumption<'a>(
    requests: impl IntoIterator<Item = &'a FuelRequest>,
    now: DateTime<Utc>,
) -> ConsumptionStats {
    let window_start = now
        .checked_sub_months(Months::new(TRAILING_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut stats = ConsumptionStats {
        total_spent: 0.0,
        monthly_average: 0.0,
        yearly_total: 0.0,
        projected_annual: 0.0,
        fulfilled_requests: 0,
    };
    let mut trailing_quantity = 0.0;

    for request in requests
        .into_iter()
        .filter(|r| r.status == RequestStatus::Fulfilled)
    {
        stats.fulfilled_requests += 1;
        stats.total_spent += request.price;
        if request.created_at >= window_start && request.created_at <= now {
            trailing_quantity += request.quantity;
        }
        if request.created_at.year() == now.year() && request.created_at <= now {
            stats.yearly_total += request.quantity;
        }
    }

    stats.monthly_average = trailing_quantity / f64::from(TRAILING_MONTHS);
    stats.projected_annual = stats.monthly_average * 12.0;
    stats
}

/// One calendar month of a customer's fulfilled deliveries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyConsumption {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Litres delivered
    pub quantity: f64,
    /// Amount paid
    pub spent: f64,
    /// Deliveries in the month
    pub requests: usize,
}

fn month_index(year: i32, month0: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn empty_month(index: i64) -> MonthlyConsumption {
    MonthlyConsumption {
        year: index.div_euclid(12) as i32,
        month: index.rem_euclid(12) as u32 + 1,
        quantity: 0.0,
        spent: 0.0,
        requests: 0,
    }
}

/// Per-month series for the `months` calendar months ending with the month of `now`, oldest first.
///
/// Months without deliveries are present with zeros. `months` is capped at
/// [`MAX_SERIES_MONTHS`].
pub async fn monthly_consumption(
    store: &DocumentStore,
    user_id: &str,
    months: u32,
    now: DateTime<Utc>,
) -> Result<Vec<MonthlyConsumption>> {
    let requests = store.get_requests().await?;

    let last = month_index(now.year(), now.month0());
    let first = last - i64::from(months.min(MAX_SERIES_MONTHS)) + 1;

    let mut series: Vec<MonthlyConsumption> = (first..=last).map(empty_month).collect();

    for request in requests.iter().filter(|r| {
        r.user_id == user_id && r.status == RequestStatus::Fulfilled && r.created_at <= now
    }) {
        let index = month_index(request.created_at.year(), request.created_at.month0());
        if index < first {
            continue;
        }
        let Ok(slot) = usize::try_from(index - first) else {
            continue;
        };
        if let Some(bucket) = series.get_mut(slot) {
            bucket.quantity += request.quantity;
            bucket.spent += request.price;
            bucket.requests += 1;
        }
    }

    Ok(series)
}

/// Number of requests created on each calendar day (UTC).
pub async fn requests_by_date(store: &DocumentStore) -> Result<BTreeMap<NaiveDate, usize>> {
    let mut counts = BTreeMap::new();
    for request in store.get_requests().await? {
        *counts.entry(request.created_at.date_naive()).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Number of requests in each status. Statuses with no requests are omitted.
pub async fn status_breakdown(store: &DocumentStore) -> Result<BTreeMap<RequestStatus, usize>> {
    let mut counts = BTreeMap::new();
    for request in store.get_requests().await? {
        *counts.entry(request.status).or_insert(0) += 1;
    }
    Ok(counts)
}

/// What a station operator sees.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDashboard {
    /// The station
    pub station: FuelStation,
    /// Requests awaiting a decision, oldest first
    pub pending: Vec<FuelRequest>,
    /// Requests created today (UTC), any status
    pub today: Vec<FuelRequest>,
    /// Fuel types below their reorder threshold
    pub low_stock: Vec<FuelType>,
}

/// Dashboard for `station_id` as of `now`.
pub async fn station_dashboard(
    store: &DocumentStore,
    station_id: i64,
    now: DateTime<Utc>,
) -> Result<StationDashboard> {
    let station = station::get_station(store, station_id).await?;
    let requests: Vec<FuelRequest> = store
        .get_requests()
        .await?
        .into_iter()
        .filter(|r| r.station_id == station_id)
        .collect();

    let mut pending: Vec<FuelRequest> = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Pending)
        .cloned()
        .collect();
    pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let today_date = now.date_naive();
    let today = requests
        .into_iter()
        .filter(|r| r.created_at.date_naive() == today_date)
        .collect();

    let low_stock = station.low_stock();
    Ok(StationDashboard {
        station,
        pending,
        today,
        low_stock,
    })
}

/// Arithmetic mean, 0 for an empty sequence.
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}
