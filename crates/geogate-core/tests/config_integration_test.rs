//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use geogate_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use geogate_core::models::{RadiusPolicy, TargetBinding};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [
        "GEOGATE_FALLBACK_RADIUS",
        "GEOGATE_API_URL",
        "GEOGATE_API_TOKEN",
        "GEOGATE_REQUEST_TIMEOUT",
        "GEOGATE_TARGET_BINDING",
    ] {
        env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
fallback_radius = 30.0
api_url = "https://file.example.com/api"
"#,
    );

    env::set_var("GEOGATE_FALLBACK_RADIUS", "75");
    env::set_var("GEOGATE_API_TOKEN", "secret-token");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.fallback_radius.value, 75.0);
    assert_eq!(config.fallback_radius.source, ConfigSource::Environment);
    assert_eq!(config.api_url.value, "https://file.example.com/api");
    assert_eq!(config.api_url.source, ConfigSource::File);
    assert_eq!(config.api_token.value.as_deref(), Some("secret-token"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("GEOGATE_FALLBACK_RADIUS", "-5");
    env::set_var("GEOGATE_REQUEST_TIMEOUT", "0");
    env::set_var("GEOGATE_TARGET_BINDING", "closest");

    let config = LayeredConfig::with_defaults().load_from_env();

    // Rejected values leave the defaults in place
    assert_eq!(config.fallback_radius.value, 5.0);
    assert_eq!(config.fallback_radius.source, ConfigSource::Default);
    assert_eq!(config.request_timeout_secs.source, ConfigSource::Default);
    assert_eq!(config.target_binding.value, TargetBinding::SameTarget);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    let file = config_file("target_binding = \"same-target\"");
    env::set_var("GEOGATE_TARGET_BINDING", "same-target");
    env::set_var("GEOGATE_FALLBACK_RADIUS", "40");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    config.update_from_cli(CliConfigOverrides {
        fallback_radius: Some(RadiusPolicy::new(15.0).unwrap()),
        api_url: Some("http://127.0.0.1:9000/api".to_string()),
        target_binding: Some(TargetBinding::Nearest),
    });

    assert_eq!(config.fallback_radius.value, 15.0);
    assert_eq!(config.fallback_radius.source, ConfigSource::Cli);
    assert_eq!(config.api_url.source, ConfigSource::Cli);
    assert_eq!(config.target_binding.value, TargetBinding::Nearest);
    assert_eq!(config.target_binding.source, ConfigSource::Cli);

    clear_env();
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/geogate.toml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let file = config_file("fallback_radius = \"wide\"");
    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}
