//! Plain-text rendering of command results.

use crate::{
    core::{
        metrics::HealthReport,
        navigation::View,
        stats::{ConsumptionStats, MonthlyConsumption, StationDashboard},
    },
    errors::Result,
    models::{FuelRequest, FuelStation, Notification, RequestStatus, SystemStats, User},
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Formats an amount in rupees, e.g. `₹1025.00`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("₹{amount:.2}")
}

const fn status_emoji(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "🕒",
        RequestStatus::Approved => "👍",
        RequestStatus::Rejected => "❌",
        RequestStatus::Fulfilled => "✅",
    }
}

/// One-line summary of a request.
#[must_use]
pub fn format_request_line(request: &FuelRequest) -> String {
    format!(
        "{} {} | {}L {} | {} | station {} | {} | {}",
        status_emoji(request.status),
        request.id,
        request.quantity,
        request.fuel_type,
        format_amount(request.price),
        request.station_id,
        request.status,
        request.created_at.format("%Y-%m-%d %H:%M"),
    )
}

/// Request list, or a hint when there is nothing to show.
pub fn format_requests(requests: &[FuelRequest]) -> Result<String> {
    if requests.is_empty() {
        return Ok("📭 No requests found.".to_string());
    }
    let mut out = String::new();
    for request in requests {
        writeln!(out, "{}", format_request_line(request))?;
    }
    Ok(out)
}

/// Station header with inventory table.
pub fn format_station(station: &FuelStation) -> Result<String> {
    let mut out = String::new();
    let state = if station.is_active { "open" } else { "closed" };
    writeln!(
        out,
        "⛽ [{}] {} ({state}) ★{:.1}",
        station.id, station.name, station.ratings
    )?;
    writeln!(out, "   {}", station.location.address)?;
    writeln!(
        out,
        "   Hours: {} - {}",
        station.operating_hours.open, station.operating_hours.close
    )?;
    for (fuel_type, stock) in &station.inventory {
        let flag = if stock.is_below_threshold() { " ⚠️ low" } else { "" };
        writeln!(
            out,
            "   {fuel_type:<7} {:>8.1}/{:<8.1}L @ {}{flag}",
            stock.available,
            stock.capacity,
            format_amount(stock.price)
        )?;
    }
    if !station.services.is_empty() {
        let services: Vec<String> = station.services.iter().map(ToString::to_string).collect();
        writeln!(out, "   Services: {}", services.join(", "))?;
    }
    Ok(out)
}

/// Admin overview counts.
pub fn format_stats(stats: &SystemStats) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "📊 System overview")?;
    writeln!(out, "Active users:       {}", stats.active_users)?;
    writeln!(out, "Pending requests:   {}", stats.pending_requests)?;
    writeln!(out, "Fulfilled requests: {}", stats.fulfilled_requests)?;
    writeln!(out, "Stations:           {}", stats.total_stations)?;
    writeln!(out, "Average rating:     {:.2}", stats.average_rating)?;
    Ok(out)
}

/// Per-status and per-day request counts.
pub fn format_breakdowns(
    by_status: &BTreeMap<RequestStatus, usize>,
    by_date: &BTreeMap<NaiveDate, usize>,
) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "By status:")?;
    for (status, count) in by_status {
        writeln!(out, "  {status:<10} {count}")?;
    }
    writeln!(out, "By day:")?;
    for (date, count) in by_date {
        writeln!(out, "  {} {count}", date.format("%b %d"))?;
    }
    Ok(out)
}

/// Consumption summary followed by the monthly series.
pub fn format_consumption(
    stats: &ConsumptionStats,
    series: &[MonthlyConsumption],
) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "🛢️ Fuel consumption")?;
    writeln!(out, "Total spent:       {}", format_amount(stats.total_spent))?;
    writeln!(out, "Monthly average:   {:.1}L", stats.monthly_average)?;
    writeln!(out, "This year:         {:.1}L", stats.yearly_total)?;
    writeln!(out, "Projected annual:  {:.1}L", stats.projected_annual)?;
    writeln!(out, "Deliveries:        {}", stats.fulfilled_requests)?;
    for month in series {
        writeln!(
            out,
            "  {}-{:02}  {:>7.1}L  {:>10}  ({} deliveries)",
            month.year,
            month.month,
            month.quantity,
            format_amount(month.spent),
            month.requests
        )?;
    }
    Ok(out)
}

/// Operator dashboard.
pub fn format_dashboard(dashboard: &StationDashboard) -> Result<String> {
    let mut out = format_station(&dashboard.station)?;
    if !dashboard.low_stock.is_empty() {
        let low: Vec<String> = dashboard.low_stock.iter().map(ToString::to_string).collect();
        writeln!(out, "⚠️ Low stock: {}", low.join(", "))?;
    }
    writeln!(out, "Pending ({}):", dashboard.pending.len())?;
    for request in &dashboard.pending {
        writeln!(out, "  {}", format_request_line(request))?;
    }
    writeln!(out, "Today: {} request(s)", dashboard.today.len())?;
    Ok(out)
}

/// Graded health figures.
pub fn format_health(report: &HealthReport) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "🩺 System health")?;
    writeln!(
        out,
        "Load time:     {:.2}ms ({})",
        report.average_load_time, report.load_grade
    )?;
    writeln!(
        out,
        "Response time: {:.2}ms ({})",
        report.average_response_time, report.response_grade
    )?;
    writeln!(
        out,
        "Error rate:    {:.2}% ({})",
        report.error_rate, report.error_grade
    )?;
    Ok(out)
}

/// Session user with their menu.
pub fn format_whoami(user: &User, views: &[View]) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "👤 {} ({}) - {}",
        user.profile.full_name, user.username, user.role
    )?;
    let menu: Vec<&str> = views.iter().map(|v| v.label()).collect();
    writeln!(out, "Menu: {}", menu.join(" | "))?;
    for vehicle in &user.profile.vehicles {
        writeln!(
            out,
            "🚗 {} {} ({}, {}) id {}",
            vehicle.kind, vehicle.model, vehicle.registration_number, vehicle.fuel_type, vehicle.id
        )?;
    }
    Ok(out)
}

/// Notification list with unread markers.
pub fn format_notifications(notifications: &[Notification]) -> Result<String> {
    if notifications.is_empty() {
        return Ok("🔕 No notifications.".to_string());
    }
    let mut out = String::new();
    for n in notifications {
        let marker = if n.read { " " } else { "•" };
        writeln!(
            out,
            "{marker} [{}] {}: {} ({})",
            n.id,
            n.title,
            n.message,
            n.timestamp.format("%Y-%m-%d %H:%M")
        )?;
    }
    Ok(out)
}

/// User table for admins.
pub fn format_users(users: &[User]) -> Result<String> {
    let mut out = String::new();
    for user in users {
        let state = if user.is_active { "active" } else { "disabled" };
        writeln!(
            out,
            "{} | {} | {} | {state}",
            user.id, user.username, user.role
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::metrics::health_of;
    use crate::models::{FuelStock, FuelType, SystemMetrics};
    use crate::test_utils::sample_station;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1025.0), "₹1025.00");
        assert_eq!(format_amount(0.456), "₹0.46");
    }

    #[test]
    fn test_format_station_flags_low_stock() {
        let mut station = sample_station(1, 100.0);
        station.inventory.insert(
            FuelType::Cng,
            FuelStock {
                available: 10.0,
                capacity: 500.0,
                price: 76.5,
                threshold: 50.0,
            },
        );

        let text = format_station(&station).unwrap();
        assert!(text.contains("Station 1 (open)"));
        let cng_line = text.lines().find(|l| l.contains("CNG")).unwrap();
        assert!(cng_line.contains("low"));
        let petrol_line = text.lines().find(|l| l.contains("Petrol")).unwrap();
        assert!(!petrol_line.contains("low"));
    }

    #[test]
    fn test_format_requests_empty() {
        assert_eq!(format_requests(&[]).unwrap(), "📭 No requests found.");
    }

    #[test]
    fn test_format_health() {
        let text = format_health(&health_of(&SystemMetrics::default())).unwrap();
        assert!(text.contains("Load time:     0.00ms (Excellent)"));
    }
}
