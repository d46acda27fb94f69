//! CLI entry point for the outlet watcher.
//!
//! Provides subcommands for scanning the configured stations into an HTML
//! occupancy report and for probing whether the portal session is alive.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use outlet_watch::config::{self, SessionConfig};
use outlet_watch::engine::collect_states;
use outlet_watch::fetch::{BasicClient, SessionHeaders};
use outlet_watch::portal::PortalClient;
use outlet_watch::report::build_report;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "outlet_watch")]
#[command(about = "Watches campus charging outlets and publishes an occupancy report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan all configured stations and write the occupancy report
    Scan {
        /// Path to the ordered station list
        #[arg(short, long, default_value = "stations.json")]
        stations: String,

        /// File to write the rendered HTML report to
        #[arg(short, long, default_value = "build/html/index.html")]
        output: String,

        /// Optional directory for raw per-run JSON snapshots
        #[arg(short, long)]
        data_dir: Option<String>,

        /// Per-request timeout in seconds
        #[arg(short, long, default_value_t = 30)]
        timeout: u64,
    },
    /// Probe whether the configured portal session is still accepted
    CheckSession,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/outlet_watch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("outlet_watch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            stations,
            output,
            data_dir,
            timeout,
        } => {
            scan(&stations, &output, data_dir.as_deref(), timeout).await?;
        }
        Commands::CheckSession => {
            let portal = portal_from_env(30)?;
            if portal.check_alive().await {
                info!("Portal session is alive");
            } else {
                bail!("portal session rejected, refresh PORTAL_SESSION_ID");
            }
        }
    }

    Ok(())
}

fn portal_from_env(timeout_secs: u64) -> Result<PortalClient<SessionHeaders<BasicClient>>> {
    let session = SessionConfig::from_env()?;
    let http = SessionHeaders::new(
        BasicClient::new(Duration::from_secs(timeout_secs)),
        &session.session_id,
    );
    Ok(PortalClient::new(http, session.base_url))
}

#[tracing::instrument(skip_all, fields(stations = stations_path, output = output_path))]
async fn scan(
    stations_path: &str,
    output_path: &str,
    data_dir: Option<&str>,
    timeout: u64,
) -> Result<()> {
    let stations = config::load_stations(Path::new(stations_path))?;
    info!(station_count = stations.len(), "Station list loaded");

    let portal = Arc::new(portal_from_env(timeout)?);
    if !portal.check_alive().await {
        bail!("portal session rejected before scan, refresh PORTAL_SESSION_ID");
    }

    let states = collect_states(Arc::clone(&portal), &stations).await?;
    let now = Utc::now();

    if let Some(dir) = data_dir {
        if !states.is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating snapshot directory {dir}"))?;
            let snapshot = Path::new(dir).join(format!("{}.json", now.timestamp_millis()));
            fs::write(&snapshot, serde_json::to_string(&states)?)
                .with_context(|| format!("writing snapshot {}", snapshot.display()))?;
            info!(path = %snapshot.display(), "Raw snapshot written");
        }
    }

    let report = build_report(&stations, states, now);
    if let Some(parent) = Path::new(output_path).parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    fs::write(output_path, report.to_html())
        .with_context(|| format!("writing report {output_path}"))?;
    info!(path = output_path, up = report.up, "Report written");

    Ok(())
}
