#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

use upplink::{ConnectivityStatus, HttpProber, Monitor, MonitorSettings};

mod bus;
mod config;
mod sinks;

use bus::ServiceEvent;
use config::Config;
use sinks::{BusStatusSink, ConsoleAlarm};

#[derive(Parser)]
#[command(name = "upplink-service", version, about = "Outbound connectivity monitor")]
struct Cli {
    /// Path to the TOML config file (created with defaults if missing)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Monitor connectivity until interrupted (default)
    Run {
        /// Polling interval in seconds (1-3600), overriding the config
        #[arg(long)]
        interval: Option<u64>,
        /// Probe endpoint URL, overriding the config
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Perform a single connectivity check and exit non-zero when offline
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run { interval: None, endpoint: None }) {
        Command::Run { interval, endpoint } => {
            if let Some(interval) = interval {
                config.monitor.interval_seconds = interval;
            }
            if let Some(endpoint) = endpoint {
                config.monitor.endpoint = endpoint;
            }
            run(&config).await
        }
        Command::Check => check(&config).await,
    }
}

/// Initialize tracing subscriber with default configuration.
fn init_tracing() {
    let env_filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(env_filter).compact().init();
}

fn build_monitor(config: &Config) -> Result<Monitor> {
    let probe_timeout = Duration::from_secs(config.monitor.probe_timeout_seconds);
    let prober = Arc::new(HttpProber::new(&config.monitor.endpoint, probe_timeout)?);

    let settings = MonitorSettings {
        interval_seconds: config.monitor.interval_seconds,
        probe_timeout,
        alarm_frequency_hz: config.alarm.frequency_hz,
        alarm_tone_duration_ms: config.alarm.tone_duration_ms,
    };

    let monitor = Monitor::new(
        prober,
        Arc::new(BusStatusSink),
        Arc::new(ConsoleAlarm::new(config.alarm.wav_path.clone())),
        settings,
    )?;
    Ok(monitor)
}

async fn run(config: &Config) -> Result<()> {
    println!("{config}");

    let monitor = build_monitor(config)?;
    let render = tokio::spawn(render_events());

    monitor.start()?;
    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");

    monitor.stop().await;
    info!(status = %monitor.status(), "monitor idle");
    render.abort();
    Ok(())
}

async fn check(config: &Config) -> Result<()> {
    let monitor = build_monitor(config)?;
    let status = monitor.check_now().await?;
    println!("{status}");

    if status != ConnectivityStatus::Connected {
        std::process::exit(1);
    }
    Ok(())
}

/// Consume bus events on the caller's side of the marshaling boundary
async fn render_events() {
    let mut events = bus::subscribe();
    loop {
        match events.recv().await {
            Ok(ServiceEvent::Status { status, at }) => {
                info!(%status, last_check = %at.format("%H:%M:%S"), "connectivity");
            }
            Ok(ServiceEvent::Alarm { sounding: true }) => warn!("connection lost, alarm sounding"),
            Ok(ServiceEvent::Alarm { sounding: false }) => info!("alarm silenced"),
            Ok(ServiceEvent::Fault(message)) => error!(%message, "monitor session faulted"),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "render task lagged behind the bus"),
            Err(RecvError::Closed) => break,
        }
    }
}
