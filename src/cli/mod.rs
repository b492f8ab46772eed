//! Command-line front end.
//!
//! `args` defines the `clap` surface, `handlers` maps each command onto
//! `core` operations for the session user, and `format` renders the results.

pub mod args;
mod context;
pub mod format;
pub mod handlers;

pub use args::{Cli, Command, RequestArgs, StationAction, UserAction};
pub use context::AppContext;
pub use handlers::execute;
