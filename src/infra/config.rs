//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::domain::sequence::{SecretCode, DEFAULT_SECRET};
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Identifier stamped on egressed attempts
    #[serde(default = "default_site_id")]
    pub id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { id: default_site_id() }
    }
}

fn default_site_id() -> String {
    "latch".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeConfig {
    /// Packed combination, high nibble = sensor B count, low nibble = sensor A count
    #[serde(default = "default_secret")]
    pub secret: u8,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self { secret: default_secret() }
    }
}

fn default_secret() -> u8 {
    DEFAULT_SECRET
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Status indicator dark time after each detection
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u32,
    /// Motor run time on a correct sequence
    #[serde(default = "default_motor_pulse_ms")]
    pub motor_pulse_ms: u32,
    /// Dark time of each alert blink
    #[serde(default = "default_alert_blink_ms")]
    pub alert_blink_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            feedback_ms: default_feedback_ms(),
            motor_pulse_ms: default_motor_pulse_ms(),
            alert_blink_ms: default_alert_blink_ms(),
        }
    }
}

fn default_feedback_ms() -> u32 {
    1000
}

fn default_motor_pulse_ms() -> u32 {
    3000
}

fn default_alert_blink_ms() -> u32 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_alert_blinks")]
    pub blinks: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { blinks: default_alert_blinks() }
    }
}

fn default_alert_blinks() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Virtual time consumed by each input read
    #[serde(default = "default_poll_cost_ms")]
    pub poll_cost_ms: u64,
    /// Block the host thread on simulated sleeps
    #[serde(default)]
    pub realtime: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { poll_cost_ms: default_poll_cost_ms(), realtime: false }
    }
}

fn default_poll_cost_ms() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct EgressConfig {
    /// File path for attempt egress (JSONL format)
    #[serde(default = "default_egress_file")]
    pub file: String,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self { file: default_egress_file() }
    }
}

fn default_egress_file() -> String {
    "attempts.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Log a metrics summary when the run ends
    #[serde(default = "default_metrics_report")]
    pub report: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { report: default_metrics_report() }
    }
}

fn default_metrics_report() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub code: CodeConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub egress: EgressConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    site_id: String,
    secret: SecretCode,
    feedback_ms: u32,
    motor_pulse_ms: u32,
    alert_blink_ms: u32,
    alert_blinks: u32,
    poll_cost_ms: u64,
    realtime: bool,
    egress_file: String,
    metrics_report: bool,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            site_id: toml_config.site.id,
            secret: SecretCode::new(toml_config.code.secret),
            feedback_ms: toml_config.timing.feedback_ms,
            motor_pulse_ms: toml_config.timing.motor_pulse_ms,
            alert_blink_ms: toml_config.timing.alert_blink_ms,
            alert_blinks: toml_config.alert.blinks,
            poll_cost_ms: toml_config.sim.poll_cost_ms,
            realtime: toml_config.sim.realtime,
            egress_file: toml_config.egress.file,
            metrics_report: toml_config.metrics.report,
            config_file,
        }
    }

    /// Determine config file path from an explicit argument or environment
    pub fn resolve_config_path(arg: Option<&str>) -> String {
        if let Some(path) = arg {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn secret(&self) -> SecretCode {
        self.secret
    }

    pub fn feedback_ms(&self) -> u32 {
        self.feedback_ms
    }

    pub fn motor_pulse_ms(&self) -> u32 {
        self.motor_pulse_ms
    }

    pub fn alert_blink_ms(&self) -> u32 {
        self.alert_blink_ms
    }

    pub fn alert_blinks(&self) -> u32 {
        self.alert_blinks
    }

    pub fn poll_cost_ms(&self) -> u64 {
        self.poll_cost_ms
    }

    pub fn realtime(&self) -> bool {
        self.realtime
    }

    pub fn egress_file(&self) -> &str {
        &self.egress_file
    }

    pub fn metrics_report(&self) -> bool {
        self.metrics_report
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to try variant codes
    pub fn with_secret(mut self, secret: SecretCode) -> Self {
        self.secret = secret;
        self
    }

    /// Builder method for tests to shorten the alert
    pub fn with_alert_blinks(mut self, blinks: u32) -> Self {
        self.alert_blinks = blinks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site_id(), "latch");
        assert_eq!(config.secret().value(), 0x23);
        assert_eq!(config.feedback_ms(), 1000);
        assert_eq!(config.motor_pulse_ms(), 3000);
        assert_eq!(config.alert_blink_ms(), 1000);
        assert_eq!(config.alert_blinks(), 5);
        assert_eq!(config.poll_cost_ms(), 1);
        assert!(!config.realtime());
        assert_eq!(config.egress_file(), "attempts.jsonl");
        assert!(config.metrics_report());
        assert_eq!(config.config_file(), "default");
    }

    #[test]
    fn test_resolve_config_path_from_arg() {
        assert_eq!(Config::resolve_config_path(Some("config/bench.toml")), "config/bench.toml");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[code]
secret = 0x41

[timing]
motor_pulse_ms = 500
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "inline".to_string());

        assert_eq!(config.secret().value(), 0x41);
        assert_eq!(config.motor_pulse_ms(), 500);
        assert_eq!(config.feedback_ms(), 1000);
        assert_eq!(config.alert_blinks(), 5);
    }

    #[test]
    fn test_secret_out_of_range_rejected() {
        let result: Result<TomlConfig, _> = toml::from_str("[code]\nsecret = 300\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_builders() {
        let config =
            Config::default().with_secret(SecretCode::from_counts(1, 1)).with_alert_blinks(2);
        assert_eq!(config.secret().value(), 0x11);
        assert_eq!(config.alert_blinks(), 2);
    }
}
