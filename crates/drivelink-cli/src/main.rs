//! `drivelink` – remote-control client for a differential-drive robot.
//!
//! Reads operator input from the terminal, tank-mixes it into per-wheel
//! power commands, and streams them as newline-delimited JSON over TCP to
//! the robot's motor controller, reconnecting automatically after network
//! faults and always leaving the robot stopped on the way out.
//!
//! Startup order: structured logging → config (`~/.drivelink/config.toml`,
//! host and port required) → Ctrl-C handler → supervisor + collaborators →
//! control loop on a current-thread runtime.

mod config;
mod keyboard;
mod status;

use std::process::ExitCode;

use colored::Colorize;
use tracing::{error, info, warn};

use drivelink_control::{ControlError, Pilot};
use drivelink_link::{Supervisor, TcpConnector};
use drivelink_types::ShutdownFlag;

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the level (default "info").  Set
    // DRIVELINK_LOG_FORMAT=json for newline-delimited JSON logs suitable
    // for log aggregators.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("DRIVELINK_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            eprintln!(
                "{}: no configuration found at {}",
                "Error".red().bold(),
                config::config_path().display()
            );
            eprintln!("Create it with at least the robot endpoint:");
            eprintln!();
            eprintln!("    host = \"192.168.1.18\"");
            eprintln!("    port = 65432");
            eprintln!();
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    print_banner(&cfg);

    // ── Shutdown flag + Ctrl-C handler ────────────────────────────────────
    let shutdown = ShutdownFlag::new();
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown.request();
        }) {
            warn!(error = %e, "failed to install Ctrl-C handler; use Esc or q to quit");
        }
    }

    // ── Run ───────────────────────────────────────────────────────────────
    let outcome = run(cfg, shutdown).await;
    // The status line never printed a trailing newline.
    println!();

    match outcome {
        Ok(()) => {
            info!("client shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "client terminated on fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: Config, shutdown: ShutdownFlag) -> Result<(), ControlError> {
    info!(endpoint = %cfg.endpoint(), tick_rate_hz = cfg.tick_rate_hz, "starting control loop");

    let connector = TcpConnector::new(cfg.endpoint(), cfg.connect_timeout());
    let supervisor = Supervisor::new(connector, cfg.retry_delay(), shutdown.clone());
    let input = keyboard::KeyboardSource::new()?;
    let render = status::StatusLine::new();

    Pilot::new(cfg.pilot(), input, render, supervisor, shutdown)
        .run()
        .await
}

fn print_banner(cfg: &Config) {
    println!(
        "  {} {}  →  {}",
        "DriveLink".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed(),
        cfg.endpoint().bold().cyan(),
    );
    println!(
        "  {}",
        "drive: W/A/S/D   toggle: Enter   halt: Space   speed: ↑/↓   quit: Esc or q".dimmed()
    );
    println!();
}
