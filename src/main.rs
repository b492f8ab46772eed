use clap::Parser;
use dotenvy::dotenv;
use fuel_delivery::{
    cli::{self, AppContext, Cli},
    config::{database::get_database_url, load_or_default},
    core::{auth, metrics},
    errors::Result,
    storage::{DocumentStore, SqliteStore},
};
use std::{process::ExitCode, time::Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let boot = Instant::now();

    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Parse arguments and load settings
    let args = Cli::parse();
    let settings = load_or_default(&args.config)
        .inspect_err(|e| error!("Failed to load {}: {}", args.config.display(), e))?;

    // 4. Open the document store
    let store = SqliteStore::connect(&get_database_url())
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;
    let store = DocumentStore::new(store);

    // 5. Seed empty collections and restore a remembered session
    if settings.storage.seed_on_start {
        store
            .initialize_storage()
            .await
            .inspect_err(|e| error!("Failed to seed storage: {}", e))?;
    }
    if let Err(e) = auth::restore_session(&store).await {
        warn!("Could not restore session, continuing without one: {e}");
    }

    // 6. Run the command and record how it went
    let window = settings.metrics.sample_window;
    let ctx = AppContext::new(store, settings)?;
    let action = args.command.name();
    let started = Instant::now();
    let outcome = cli::execute(&ctx, args.command).await;
    let response_ms = started.elapsed().as_secs_f64() * 1000.0;
    let load_ms = boot.elapsed().as_secs_f64() * 1000.0;

    if let Err(e) = metrics::record_action(&ctx.store, action, outcome.is_ok()).await {
        warn!("Failed to record action '{action}': {e}");
    }
    if let Err(e) =
        metrics::record_performance_sample(&ctx.store, load_ms, response_ms, window).await
    {
        warn!("Failed to record performance sample: {e}");
    }

    match outcome {
        Ok(output) => {
            println!("{}", output.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("❌ {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
