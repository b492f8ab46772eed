//! Command handlers.
//!
//! Each handler checks the session against the roles the command needs,
//! calls into `core`, and renders the outcome as text. Errors propagate to
//! `main`, which prints their display string.

use super::{
    AppContext,
    args::{Command, RequestArgs, StationAction, UserAction},
    format,
};
use crate::{
    core::{
        auth, metrics,
        navigation::{self, Route},
        notification,
        request::{self, NewFuelRequest},
        station, stats, user,
    },
    errors::{Error, Result},
    models::{FuelRequest, RequestStatus, Role, User, Vehicle},
};
use chrono::Utc;
use std::fmt::Write;
use tracing::{debug, warn};

const ANY_ROLE: &[Role] = &[];
const ADMIN: &[Role] = &[Role::Admin];
const CUSTOMER: &[Role] = &[Role::Customer];
const STAFF: &[Role] = &[Role::Admin, Role::StationOperator];

/// Runs `command` and returns what should be printed.
pub async fn execute(ctx: &AppContext, command: Command) -> Result<String> {
    debug!("Running command '{}'", command.name());
    match command {
        Command::Init => init(ctx).await,
        Command::Login {
            username,
            password,
            remember,
        } => login(ctx, &username, &password, remember).await,
        Command::Logout => logout(ctx).await,
        Command::Whoami => {
            let user = require(ctx, ANY_ROLE).await?;
            format::format_whoami(&user, navigation::views_for(user.role))
        }
        Command::Request(args) => place_request(ctx, args).await,
        Command::Requests { status } => list_requests(ctx, status).await,
        Command::SetStatus { id, status } => set_status(ctx, &id, status).await,
        Command::Rate { id, rating, review } => rate(ctx, &id, rating, review).await,
        Command::Stats { detailed } => system_stats(ctx, detailed).await,
        Command::Consumption { months } => consumption(ctx, months).await,
        Command::Station { action } => station_action(ctx, action).await,
        Command::Health => {
            require(ctx, ADMIN).await?;
            format::format_health(&metrics::system_health(&ctx.store).await?)
        }
        Command::Notifications { read } => notifications(ctx, read).await,
        Command::Users { action } => user_action(ctx, action).await,
    }
}

/// The session user, if their role is among `roles` (any role when empty).
async fn require(ctx: &AppContext, roles: &[Role]) -> Result<User> {
    let session = auth::current_user(&ctx.store).await?;
    match (navigation::resolve_route(session.as_ref(), roles), session) {
        (Route::Dashboard(_), Some(user)) => Ok(user),
        (Route::Unauthorized, Some(user)) => Err(Error::Unauthorized { role: user.role }),
        _ => Err(Error::NotLoggedIn),
    }
}

/// Station operators may only act on the station they manage.
async fn ensure_manages(ctx: &AppContext, user: &User, station_id: i64) -> Result<()> {
    if user.role != Role::StationOperator {
        return Ok(());
    }
    let managed = station::station_for_manager(&ctx.store, &user.id).await?;
    if managed.is_some_and(|s| s.id == station_id) {
        Ok(())
    } else {
        Err(Error::Unauthorized { role: user.role })
    }
}

async fn init(ctx: &AppContext) -> Result<String> {
    let report = ctx.store.initialize_storage().await?;
    if report.is_empty() {
        Ok("Storage already initialised, nothing to seed.".to_string())
    } else {
        Ok(format!("🌱 Seeded: {}", report.seeded.join(", ")))
    }
}

async fn login(ctx: &AppContext, username: &str, password: &str, remember: bool) -> Result<String> {
    let user = auth::login(&ctx.store, username, password, remember).await?;
    let mut out = format!("✅ Welcome, {}!\n", user.profile.full_name);
    out.push_str(&format::format_whoami(
        &user,
        navigation::views_for(user.role),
    )?);
    Ok(out)
}

async fn logout(ctx: &AppContext) -> Result<String> {
    let session = auth::current_user(&ctx.store).await;
    auth::logout(&ctx.store).await?;

    match session {
        Ok(Some(user)) => {
            #[allow(clippy::cast_precision_loss)]
            let secs = (Utc::now() - user.last_login).num_milliseconds().max(0) as f64 / 1000.0;
            let window = ctx.settings.metrics.sample_window;
            if let Err(e) = metrics::record_session(&ctx.store, secs, window).await {
                warn!("Failed to record session duration: {e}");
            }
        }
        Ok(None) => {}
        Err(e) => warn!("Discarded unreadable session: {e}"),
    }
    Ok("👋 Logged out.".to_string())
}

async fn place_request(ctx: &AppContext, args: RequestArgs) -> Result<String> {
    let user = require(ctx, CUSTOMER).await?;

    let vehicle_id = args
        .vehicle
        .or_else(|| user.profile.vehicles.first().map(|v| v.id.clone()))
        .unwrap_or_default();
    let new = NewFuelRequest {
        user_id: user.id.clone(),
        station_id: args.station,
        vehicle_id,
        fuel_type: args.fuel,
        quantity: args.quantity,
        payment_method: args
            .payment
            .unwrap_or(user.profile.preferences.preferred_payment_method),
        urgency_level: args.urgency,
        notes: args.notes,
        user_location: None,
    };

    let created = request::create_request(&ctx.store, ctx.notifier.as_ref(), new).await?;
    Ok(format!(
        "✅ Request {} placed: {}L {} for {} (pending)",
        created.id,
        created.quantity,
        created.fuel_type,
        format::format_amount(created.price)
    ))
}

async fn list_requests(ctx: &AppContext, status: Option<RequestStatus>) -> Result<String> {
    let user = require(ctx, ANY_ROLE).await?;
    let mut requests: Vec<FuelRequest> = match user.role {
        Role::Admin => {
            let mut all = ctx.store.get_requests().await?;
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            all
        }
        Role::Customer => request::requests_for_user(&ctx.store, &user.id).await?,
        Role::StationOperator => match station::station_for_manager(&ctx.store, &user.id).await? {
            Some(managed) => request::requests_for_station(&ctx.store, managed.id).await?,
            None => Vec::new(),
        },
    };
    if let Some(status) = status {
        requests.retain(|r| r.status == status);
    }
    format::format_requests(&requests)
}

async fn set_status(ctx: &AppContext, id: &str, status: RequestStatus) -> Result<String> {
    let user = require(ctx, STAFF).await?;
    let current = request::get_request(&ctx.store, id).await?;
    ensure_manages(ctx, &user, current.station_id).await?;

    let updated =
        request::update_status(&ctx.store, id, status, ctx.settings.requests.policy()).await?;
    Ok(format!("Request {} is now {}", updated.id, updated.status))
}

async fn rate(ctx: &AppContext, id: &str, rating: u8, review: Option<String>) -> Result<String> {
    let user = require(ctx, CUSTOMER).await?;
    let current = request::get_request(&ctx.store, id).await?;
    if current.user_id != user.id {
        return Err(Error::RequestNotFound { id: id.to_string() });
    }
    let rated = request::rate_request(&ctx.store, id, rating, review).await?;
    Ok(format!("⭐ Rated request {} with {rating}/5", rated.id))
}

async fn system_stats(ctx: &AppContext, detailed: bool) -> Result<String> {
    require(ctx, ADMIN).await?;
    let mut out = format::format_stats(&stats::system_stats(&ctx.store).await?)?;
    if detailed {
        let by_status = stats::status_breakdown(&ctx.store).await?;
        let by_date = stats::requests_by_date(&ctx.store).await?;
        out.push_str(&format::format_breakdowns(&by_status, &by_date)?);
    }
    Ok(out)
}

async fn consumption(ctx: &AppContext, months: u32) -> Result<String> {
    let user = require(ctx, CUSTOMER).await?;
    let now = Utc::now();
    let summary = stats::user_consumption_stats(&ctx.store, &user.id, now).await?;
    let series = stats::monthly_consumption(&ctx.store, &user.id, months, now).await?;
    format::format_consumption(&summary, &series)
}

async fn station_action(ctx: &AppContext, action: StationAction) -> Result<String> {
    match action {
        StationAction::List { all } => {
            require(ctx, ANY_ROLE).await?;
            let stations = if all {
                ctx.store.get_stations().await?
            } else {
                station::get_active_stations(&ctx.store).await?
            };
            let mut out = String::new();
            for s in &stations {
                out.push_str(&format::format_station(s)?);
            }
            if out.is_empty() {
                out.push_str("No stations found.");
            }
            Ok(out)
        }
        StationAction::Dashboard { id } => {
            let user = require(ctx, STAFF).await?;
            let station_id = match (id, user.role) {
                (Some(id), _) => id,
                (None, Role::StationOperator) => {
                    station::station_for_manager(&ctx.store, &user.id)
                        .await?
                        .ok_or(Error::Unauthorized { role: user.role })?
                        .id
                }
                (None, _) => {
                    return Err(Error::Usage {
                        message: "pass a station id".to_string(),
                    });
                }
            };
            ensure_manages(ctx, &user, station_id).await?;
            let dashboard = stats::station_dashboard(&ctx.store, station_id, Utc::now()).await?;
            format::format_dashboard(&dashboard)
        }
        StationAction::Price { id, fuel, price } => {
            let user = require(ctx, STAFF).await?;
            ensure_manages(ctx, &user, id).await?;
            let updated = station::update_fuel_price(&ctx.store, id, fuel, price).await?;
            format::format_station(&updated)
        }
        StationAction::Restock { id, fuel, litres } => {
            let user = require(ctx, STAFF).await?;
            ensure_manages(ctx, &user, id).await?;
            let updated = station::restock_fuel(&ctx.store, id, fuel, litres).await?;
            format::format_station(&updated)
        }
        StationAction::Open { id } => set_station_open(ctx, id, true).await,
        StationAction::Close { id } => set_station_open(ctx, id, false).await,
        StationAction::Review {
            id,
            rating,
            comment,
        } => {
            let user = require(ctx, CUSTOMER).await?;
            let updated = station::add_review(&ctx.store, id, &user.id, rating, &comment).await?;
            Ok(format!(
                "⭐ Thanks! {} is now rated {:.1}",
                updated.name, updated.ratings
            ))
        }
        StationAction::Favorite { id } => {
            let user = require(ctx, CUSTOMER).await?;
            let favorite = user::toggle_favorite(&ctx.store, &user.id, id).await?;
            refresh_session(ctx, &user.id).await?;
            Ok(if favorite {
                format!("❤️ Station {id} added to favorites")
            } else {
                format!("Station {id} removed from favorites")
            })
        }
    }
}

async fn set_station_open(ctx: &AppContext, id: i64, open: bool) -> Result<String> {
    require(ctx, ADMIN).await?;
    let updated = station::set_station_active(&ctx.store, id, open).await?;
    format::format_station(&updated)
}

async fn set_account_active(ctx: &AppContext, id: &str, active: bool) -> Result<String> {
    require(ctx, ADMIN).await?;
    let updated = user::set_user_active(&ctx.store, id, active).await?;
    let state = if updated.is_active { "enabled" } else { "disabled" };
    Ok(format!("User '{}' {state}", updated.username))
}

async fn notifications(ctx: &AppContext, read: Option<String>) -> Result<String> {
    let user = require(ctx, ANY_ROLE).await?;
    if let Some(id) = read {
        notification::mark_notification_read(&ctx.store, &user.id, &id).await?;
    }
    let unread = notification::unread_count(&ctx.store, &user.id).await?;
    let list = notification::notifications_for(&ctx.store, &user.id).await?;

    let mut out = String::new();
    writeln!(out, "🔔 {unread} unread")?;
    out.push_str(&format::format_notifications(&list)?);
    Ok(out)
}

async fn user_action(ctx: &AppContext, action: UserAction) -> Result<String> {
    match action {
        UserAction::List => {
            require(ctx, ADMIN).await?;
            format::format_users(&ctx.store.get_users().await?)
        }
        UserAction::Add {
            username,
            password,
            role,
            name,
            email,
            phone,
        } => {
            require(ctx, ADMIN).await?;
            let created = user::register_user(
                &ctx.store,
                user::NewUser {
                    username,
                    password,
                    role,
                    full_name: name,
                    email,
                    phone,
                },
            )
            .await?;
            Ok(format!(
                "✅ Created {} '{}' ({})",
                created.role, created.username, created.id
            ))
        }
        UserAction::Enable { id } => set_account_active(ctx, &id, true).await,
        UserAction::Disable { id } => set_account_active(ctx, &id, false).await,
        UserAction::AddVehicle {
            model,
            registration,
            fuel,
            kind,
            tank,
        } => {
            let session = require(ctx, CUSTOMER).await?;
            let vehicle = Vehicle {
                id: String::new(),
                kind,
                model,
                registration_number: registration,
                fuel_type: fuel,
                tank_capacity: tank,
            };
            let updated = user::add_vehicle(&ctx.store, &session.id, vehicle).await?;
            refresh_session(ctx, &session.id).await?;
            let added = updated
                .profile
                .vehicles
                .last()
                .map(|v| v.id.clone())
                .unwrap_or_default();
            Ok(format!("🚗 Vehicle added with id {added}"))
        }
    }
}

/// Rewrites the session snapshot from the stored user after a profile change.
async fn refresh_session(ctx: &AppContext, user_id: &str) -> Result<()> {
    let fresh = user::get_user(&ctx.store, user_id).await?;
    ctx.store.set_session(&fresh).await
}
