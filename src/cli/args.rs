//! Command-line arguments.
//!
//! Doc comments double as `--help` text.

#![allow(missing_docs)]

use crate::core::stats::MAX_SERIES_MONTHS;
use crate::models::{FuelType, PaymentMethod, RequestStatus, Role, UrgencyLevel};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fuel-delivery", version, about = "On-demand fuel delivery desk")]
pub struct Cli {
    /// Settings file; defaults apply when it does not exist
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seed any missing collections with sample data
    Init,
    /// Open a session
    Login {
        username: String,
        password: String,
        /// Keep the session across runs
        #[arg(long)]
        remember: bool,
    },
    /// Close the session and forget the remember-me token
    Logout,
    /// Show the session user and their menu
    Whoami,
    /// Order fuel (customers)
    Request(RequestArgs),
    /// List requests visible to the session user
    Requests {
        /// Only requests in this status
        #[arg(long)]
        status: Option<RequestStatus>,
    },
    /// Move a request to a new status (admins and station operators)
    SetStatus { id: String, status: RequestStatus },
    /// Rate a fulfilled request (customers)
    Rate {
        id: String,
        /// 1 to 5
        rating: u8,
        #[arg(long)]
        review: Option<String>,
    },
    /// System overview counts (admins)
    Stats {
        /// Include per-status and per-day breakdowns
        #[arg(long)]
        detailed: bool,
    },
    /// Personal fuel consumption (customers)
    Consumption {
        /// Months in the per-month series (1 to 120)
        #[arg(
            long,
            default_value_t = 6,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SERIES_MONTHS))
        )]
        months: u32,
    },
    /// Station views and administration
    Station {
        #[command(subcommand)]
        action: StationAction,
    },
    /// Graded system health (admins)
    Health,
    /// In-app notifications of the session user
    Notifications {
        /// Mark this notification as read
        #[arg(long)]
        read: Option<String>,
    },
    /// User administration
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    #[arg(long)]
    pub station: i64,
    #[arg(long)]
    pub fuel: FuelType,
    /// Litres
    #[arg(long)]
    pub quantity: f64,
    /// Vehicle id; defaults to the first registered vehicle
    #[arg(long)]
    pub vehicle: Option<String>,
    /// Defaults to the customer's preferred method
    #[arg(long)]
    pub payment: Option<PaymentMethod>,
    #[arg(long, default_value = "medium")]
    pub urgency: UrgencyLevel,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Debug, Subcommand)]
pub enum StationAction {
    /// List stations
    List {
        /// Include inactive stations
        #[arg(long)]
        all: bool,
    },
    /// Operator dashboard; defaults to the station the session user manages
    Dashboard { id: Option<i64> },
    /// Set a fuel's unit price (admins and operators)
    Price { id: i64, fuel: FuelType, price: f64 },
    /// Add litres to a fuel's stock (admins and operators)
    Restock { id: i64, fuel: FuelType, litres: f64 },
    /// Open a station for requests (admins)
    Open { id: i64 },
    /// Close a station for requests (admins)
    Close { id: i64 },
    /// Review a station (customers)
    Review {
        id: i64,
        rating: f64,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Add or remove a station from favorites (customers)
    Favorite { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// List users (admins)
    List,
    /// Create an account (admins)
    Add {
        username: String,
        password: String,
        #[arg(long, default_value = "customer")]
        role: Role,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Allow an account to log in (admins)
    Enable { id: String },
    /// Stop an account from logging in (admins)
    Disable { id: String },
    /// Register a vehicle on the session user's profile (customers)
    AddVehicle {
        #[arg(long)]
        model: String,
        #[arg(long)]
        registration: String,
        #[arg(long)]
        fuel: FuelType,
        #[arg(long, default_value = "Car")]
        kind: String,
        /// Tank capacity in litres
        #[arg(long, default_value_t = 40.0)]
        tank: f64,
    },
}

impl Command {
    /// Name recorded in action metrics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Whoami => "whoami",
            Self::Request(_) => "request",
            Self::Requests { .. } => "requests",
            Self::SetStatus { .. } => "set-status",
            Self::Rate { .. } => "rate",
            Self::Stats { .. } => "stats",
            Self::Consumption { .. } => "consumption",
            Self::Station { .. } => "station",
            Self::Health => "health",
            Self::Notifications { .. } => "notifications",
            Self::Users { .. } => "users",
        }
    }
}
