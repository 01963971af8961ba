//! `deconflict serve` — load configuration and fixtures, then start the
//! HTTP façade described in SPEC_FULL.md §6.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

use deconflict::config::Config;
use deconflict::fixtures;
use deconflict::log_format::TargetFirstFormat;
use deconflict::web;

#[derive(Parser, Debug)]
#[command(name = "deconflict", about = "Unmanned-aerial mission deconfliction oracle")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP façade (health check, mission analysis, fixture listing).
    Serve,
}

fn init_tracing() {
    let default_directive = if debug_enabled() { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().event_format(TargetFirstFormat))
        .with(sentry_tracing::layer())
        .init();
}

/// `DECONFLICT_DEBUG` (§6) raises the default log level to `debug` when
/// `RUST_LOG` is unset. `RUST_LOG` always wins when both are present.
fn debug_enabled() -> bool {
    std::env::var("DECONFLICT_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn init_sentry() -> Option<sentry::ClientInitGuard> {
    std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 0.0,
                ..Default::default()
            },
        ))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let _sentry_guard = init_sentry();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = Config::from_env().context("loading configuration from environment")?;
            let simulated_flights = fixtures::load_fixtures(&config.fixtures_path);
            tracing::info!(
                count = simulated_flights.len(),
                path = %config.fixtures_path.display(),
                "loaded simulated flight fixtures"
            );

            web::start_web_server(config, simulated_flights).await?;
        }
    }

    Ok(())
}
