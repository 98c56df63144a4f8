//! Integration tests for configuration loading

use photolatch::infra::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[site]
id = "test-site"

[code]
secret = 0x14

[timing]
feedback_ms = 250
motor_pulse_ms = 1500
alert_blink_ms = 400

[alert]
blinks = 3

[sim]
poll_cost_ms = 2

[egress]
file = "out/attempts.jsonl"

[metrics]
report = false
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.site_id(), "test-site");
    assert_eq!(config.secret().value(), 0x14);
    assert_eq!(config.secret().required_a(), 4);
    assert_eq!(config.secret().required_b(), 1);
    assert_eq!(config.feedback_ms(), 250);
    assert_eq!(config.motor_pulse_ms(), 1500);
    assert_eq!(config.alert_blink_ms(), 400);
    assert_eq!(config.alert_blinks(), 3);
    assert_eq!(config.poll_cost_ms(), 2);
    assert_eq!(config.egress_file(), "out/attempts.jsonl");
    assert!(!config.metrics_report());
    assert_eq!(config.config_file(), temp_file.path().display().to_string());
}

#[test]
fn test_empty_file_uses_defaults() {
    let temp_file = NamedTempFile::new().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.secret().value(), 0x23);
    assert_eq!(config.alert_blinks(), 5);
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[code]\nsecret = \"two-three\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.site_id(), "latch");
    assert_eq!(config.secret().value(), 0x23);
    assert_eq!(config.config_file(), "default");
}
