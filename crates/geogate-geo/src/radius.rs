//! Radius policy: classification against the allowed radius and resolution of
//! raw settings values.

use geogate_core::error::ConfigError;
use geogate_core::models::RadiusPolicy;
use serde::Serialize;
use tracing::warn;

/// Whether a distance falls inside the policy's radius (boundary inclusive)
pub fn is_within(distance_meters: f64, policy: &RadiusPolicy) -> bool {
    distance_meters <= policy.allowed_meters()
}

/// Build the policy for a new radius value
///
/// On failure the caller keeps its previous policy; see [`refresh_policy`].
pub fn update_allowed_radius(new_value: f64) -> Result<RadiusPolicy, ConfigError> {
    RadiusPolicy::new(new_value)
}

/// Why a raw radius setting was not adopted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The settings source had no value
    Missing,
    /// The value did not parse or was not positive
    Rejected(String),
}

/// Outcome of resolving a raw radius setting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusResolution {
    pub policy: RadiusPolicy,
    /// Set when the policy is a fallback rather than the configured value
    pub fallback: Option<FallbackReason>,
}

impl RadiusResolution {
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Parse a raw settings value into a policy
fn parse_raw(raw: &str) -> Result<RadiusPolicy, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Unparseable { raw: raw.to_string() })?;
    update_allowed_radius(value)
}

/// Resolve a raw settings value, adopting `fallback` when it is missing or unusable
///
/// Never yields a zero radius. Every fallback is reported in the result and logged.
pub fn resolve_radius(raw: Option<&str>, fallback: RadiusPolicy) -> RadiusResolution {
    let reason = match raw {
        None => FallbackReason::Missing,
        Some(raw) if raw.trim().is_empty() => FallbackReason::Missing,
        Some(raw) => match parse_raw(raw) {
            Ok(policy) => return RadiusResolution { policy, fallback: None },
            Err(e) => FallbackReason::Rejected(e.to_string()),
        },
    };

    warn!(
        fallback_meters = fallback.allowed_meters(),
        reason = ?reason,
        "Radius setting unusable, applying fallback radius"
    );

    RadiusResolution { policy: fallback, fallback: Some(reason) }
}

/// Apply a raw settings value on top of the current policy
///
/// A missing or invalid value keeps `current`, so a previously valid radius is
/// never replaced by a bad one.
pub fn refresh_policy(current: RadiusPolicy, raw: Option<&str>) -> RadiusResolution {
    resolve_radius(raw, current)
}
