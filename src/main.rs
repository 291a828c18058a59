//! Bitcoin Balance Monitor - Entry Point
//!
//! Polls a block explorer for every configured address and sends a
//! notification when a balance moves. Runs until the process is killed.
//!
//! Wiring sequence:
//! 1. Parse CLI arguments (--config, --test-notifications)
//! 2. Load config.json + validate
//! 3. Init tracing (pretty or JSON structured logging)
//! 4. Register notification endpoints (bad URLs are skipped)
//! 5. --test-notifications: send one test message and exit
//! 6. Create EsploraClient (implements BalanceSource port)
//! 7. Build AddressMonitor (requires at least one address)
//! 8. Run the poll-compare-notify loop forever

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use btc_balance_monitor::adapters::explorer::{EsploraClient, EsploraClientConfig};
use btc_balance_monitor::adapters::notify::UrlEndpointFactory;
use btc_balance_monitor::config::{self, LogFormat, MonitorConfig};
use btc_balance_monitor::usecases::{AddressMonitor, MonitorSettings, NotificationDispatcher};

/// Monitor Bitcoin addresses for incoming funds.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Send a test notification using the configured notification URLs, then exit.
    #[arg(long)]
    test_notifications: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── 1. Load configuration from config.json ──────────────
    let config = match config::loader::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            // No config means no log settings: fall back to defaults.
            init_tracing("info", LogFormat::Pretty);
            error!(path = %cli.config.display(), error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // ── 2. Initialize logging ───────────────────────────────
    init_tracing(&config.log_level, config.log_format);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Monitor stopped");
            ExitCode::FAILURE
        }
    }
}

/// Wire adapters into the monitor and run it.
async fn run(cli: Cli, config: MonitorConfig) -> Result<()> {
    info!(
        config = %cli.config.display(),
        version = env!("CARGO_PKG_VERSION"),
        addresses = config.addresses.len(),
        interval_secs = config.interval,
        notify_errors = config.notify_errors,
        notification_urls = config.apprise_urls.len(),
        "Starting Bitcoin address monitor"
    );

    // ── 3. Register notification endpoints ──────────────────
    let factory = Arc::new(
        UrlEndpointFactory::with_default_client()
            .context("Failed to create notification client")?,
    );
    let dispatcher = NotificationDispatcher::from_urls(factory, &config.apprise_urls)
        .with_link_template(config.explorer.address_url.clone());

    // ── 4. Test mode: one message, no loop ──────────────────
    if cli.test_notifications {
        dispatcher.send_test().await;
        return Ok(());
    }

    // ── 5. Create explorer client (BalanceSource port) ──────
    let source = Arc::new(
        EsploraClient::new(EsploraClientConfig::from(&config.explorer))
            .context("Failed to create explorer client")?,
    );

    // ── 6. Build and run the monitor ────────────────────────
    let mut monitor = AddressMonitor::new(source, dispatcher, MonitorSettings::from(&config))?;
    monitor.run().await;

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
