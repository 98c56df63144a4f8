//! Photolatch - two-sensor sequence latch on a simulated board
//!
//! Plays a user-action script against the latch state machine, writes
//! every evaluated attempt to the egress file and logs a summary.
//!
//! Module structure:
//! - `domain/` - Tally, secret code, BCD counter
//! - `io/` - Pin capabilities, simulated board, scripts, egress
//! - `services/` - The latch loop and its handlers
//! - `infra/` - Config and metrics

use anyhow::Context;
use clap::Parser;
use photolatch::infra::{Config, Metrics};
use photolatch::io::{Egress, Script, SimBoard};
use photolatch::services::Latch;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Photolatch - photo-sensor sequence latch
#[derive(Parser, Debug)]
#[command(name = "photolatch", version, about)]
struct Args {
    /// Path to TOML configuration file (falls back to CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Path to TOML user-action script
    #[arg(short, long, default_value = "scripts/unlock.toml")]
    script: String,

    /// Extra idle time after the script ends, in virtual milliseconds
    #[arg(long, default_value = "0")]
    tail_ms: u64,

    /// Pace the simulation against the wall clock
    #[arg(long)]
    realtime: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(git_hash = %env!("GIT_HASH"), "photolatch starting");

    let args = Args::parse();

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let config = Config::load_from_path(&config_path);
    let script = Script::from_file(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script))?;

    info!(
        config_file = %config.config_file(),
        site_id = %config.site_id(),
        secret = %format!("{:#04x}", config.secret().value()),
        feedback_ms = %config.feedback_ms(),
        motor_pulse_ms = %config.motor_pulse_ms(),
        alert_blinks = %config.alert_blinks(),
        alert_blink_ms = %config.alert_blink_ms(),
        script = %args.script,
        actions = %script.actions.len(),
        presses = %script.presses(),
        "config_loaded"
    );

    let realtime = args.realtime || config.realtime();
    let sim = SimBoard::new(config.poll_cost_ms()).with_realtime(realtime);
    let end_ms = sim.load_script(&script, 0) + args.tail_ms;

    let metrics = Arc::new(Metrics::new());
    let egress = Egress::new(config.egress_file(), config.site_id());
    let report_metrics = config.metrics_report();

    let mut latch = Latch::new(config, sim.board(), metrics.clone());
    latch.power_on();

    let clock = sim.clone();
    let attempts = latch.run_while(|| clock.now_ms() < end_ms);

    let written = egress.write_attempts(&attempts);
    for _ in written..attempts.len() {
        metrics.record_egress_failure();
    }

    info!(
        attempts = %attempts.len(),
        egressed = %written,
        display = %format!("{:#04x}", sim.display()),
        virtual_ms = %sim.now_ms(),
        "script_finished"
    );

    if report_metrics {
        metrics.report().log();
    }

    Ok(())
}
