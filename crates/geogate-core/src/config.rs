use crate::error::{GeogateError, Result};
use crate::models::{RadiusPolicy, TargetBinding, DEFAULT_FALLBACK_RADIUS_METERS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default base URL of the facility API
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default timeout for backend requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoGate
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub fallback_radius: ConfigValue<f64>,
    pub api_url: ConfigValue<String>,
    pub api_token: ConfigValue<Option<String>>,
    pub request_timeout_secs: ConfigValue<u64>,
    pub target_binding: ConfigValue<TargetBinding>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            fallback_radius: ConfigValue::new(
                DEFAULT_FALLBACK_RADIUS_METERS,
                ConfigSource::Default,
            ),
            api_url: ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default),
            api_token: ConfigValue::new(None, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(
                DEFAULT_REQUEST_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
            target_binding: ConfigValue::new(TargetBinding::default(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeogateError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeogateError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(radius) = file_config.fallback_radius {
            let radius = RadiusPolicy::new(radius).map_err(|e| GeogateError::ConfigInvalid {
                key: "fallback_radius".to_string(),
                reason: e.to_string(),
            })?;
            self.fallback_radius.update(radius.allowed_meters(), ConfigSource::File);
        }

        if let Some(api_url) = file_config.api_url {
            self.api_url.update(api_url, ConfigSource::File);
        }

        if let Some(api_token) = file_config.api_token {
            self.api_token.update(Some(api_token), ConfigSource::File);
        }

        if let Some(timeout) = file_config.request_timeout_secs {
            if timeout == 0 {
                return Err(GeogateError::ConfigInvalid {
                    key: "request_timeout_secs".to_string(),
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            self.request_timeout_secs.update(timeout, ConfigSource::File);
        }

        if let Some(binding) = file_config.target_binding {
            self.target_binding.update(binding, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOGATE_FALLBACK_RADIUS
        if let Ok(radius_str) = env::var("GEOGATE_FALLBACK_RADIUS") {
            match parse_radius(&radius_str) {
                Ok(radius) => {
                    self.fallback_radius.update(radius.allowed_meters(), ConfigSource::Environment)
                }
                Err(e) => tracing::warn!("Invalid GEOGATE_FALLBACK_RADIUS value: {}", e),
            }
        }

        // GEOGATE_API_URL
        if let Ok(api_url) = env::var("GEOGATE_API_URL") {
            self.api_url.update(api_url, ConfigSource::Environment);
        }

        // GEOGATE_API_TOKEN
        if let Ok(token) = env::var("GEOGATE_API_TOKEN") {
            self.api_token.update(Some(token), ConfigSource::Environment);
        }

        // GEOGATE_REQUEST_TIMEOUT
        if let Ok(timeout_str) = env::var("GEOGATE_REQUEST_TIMEOUT") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) if timeout > 0 => {
                    self.request_timeout_secs.update(timeout, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOGATE_REQUEST_TIMEOUT value '{}': expected a positive number of seconds",
                    timeout_str
                ),
            }
        }

        // GEOGATE_TARGET_BINDING
        if let Ok(binding_str) = env::var("GEOGATE_TARGET_BINDING") {
            match binding_str.parse::<TargetBinding>() {
                Ok(binding) => self.target_binding.update(binding, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOGATE_TARGET_BINDING value '{}': expected nearest or same-target",
                    binding_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(radius) = overrides.fallback_radius {
            self.fallback_radius.update(radius.allowed_meters(), ConfigSource::Cli);
        }

        if let Some(api_url) = overrides.api_url {
            self.api_url.update(api_url, ConfigSource::Cli);
        }

        if let Some(binding) = overrides.target_binding {
            self.target_binding.update(binding, ConfigSource::Cli);
        }
    }

    /// The fallback radius as a policy
    pub fn fallback_policy(&self) -> RadiusPolicy {
        RadiusPolicy::new(self.fallback_radius.value).unwrap_or_default()
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "fallback_radius".to_string(),
            (format!("{} m", self.fallback_radius.value), self.fallback_radius.source),
        );

        map.insert("api_url".to_string(), (self.api_url.value.clone(), self.api_url.source));

        let token = if self.api_token.value.is_some() { "(set)" } else { "(unset)" };
        map.insert("api_token".to_string(), (token.to_string(), self.api_token.source));

        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );

        map.insert(
            "target_binding".to_string(),
            (self.target_binding.value.to_string(), self.target_binding.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    fallback_radius: Option<f64>,
    api_url: Option<String>,
    api_token: Option<String>,
    request_timeout_secs: Option<u64>,
    target_binding: Option<TargetBinding>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub fallback_radius: Option<RadiusPolicy>,
    pub api_url: Option<String>,
    pub target_binding: Option<TargetBinding>,
}

/// Parse a radius in meters from a string
pub fn parse_radius(s: &str) -> Result<RadiusPolicy> {
    let value = s.trim().parse::<f64>().map_err(|_| GeogateError::ConfigInvalid {
        key: "radius".to_string(),
        reason: format!("'{}' is not a number of meters", s),
    })?;
    Ok(RadiusPolicy::new(value)?)
}
