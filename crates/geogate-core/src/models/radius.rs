use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Radius adopted when the settings source is unavailable or returns an unusable value.
///
/// Deployments are expected to override this through configuration; five meters
/// is tighter than typical consumer GPS accuracy.
pub const DEFAULT_FALLBACK_RADIUS_METERS: f64 = 5.0;

/// Allowed distance between a worker and a target, in meters
///
/// Always positive and finite. The only way to obtain a different radius is
/// through [`RadiusPolicy::new`], which rejects invalid values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusPolicy {
    allowed_meters: f64,
}

impl RadiusPolicy {
    pub fn new(allowed_meters: f64) -> Result<Self, ConfigError> {
        if allowed_meters.is_finite() && allowed_meters > 0.0 {
            Ok(Self { allowed_meters })
        } else {
            Err(ConfigError::NonPositive { value: allowed_meters })
        }
    }

    /// Policy built from [`DEFAULT_FALLBACK_RADIUS_METERS`]
    pub fn fallback() -> Self {
        Self { allowed_meters: DEFAULT_FALLBACK_RADIUS_METERS }
    }

    pub fn allowed_meters(&self) -> f64 {
        self.allowed_meters
    }
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Which radius setting applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusKind {
    /// Check-in and check-out
    Attendance,
    /// Task completion against a declared location
    Task,
}

impl RadiusKind {
    /// Key under which the settings source stores this radius
    pub fn settings_key(&self) -> &'static str {
        match self {
            RadiusKind::Attendance => "attendance_radius",
            RadiusKind::Task => "task_radius",
        }
    }
}

impl fmt::Display for RadiusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.settings_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejects_non_positive() {
        assert_eq!(RadiusPolicy::new(0.0), Err(ConfigError::NonPositive { value: 0.0 }));
        assert!(RadiusPolicy::new(-5.0).is_err());
        assert!(RadiusPolicy::new(f64::NAN).is_err());
        assert!(RadiusPolicy::new(f64::INFINITY).is_err());
        assert_eq!(RadiusPolicy::new(50.0).unwrap().allowed_meters(), 50.0);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(RadiusPolicy::default().allowed_meters(), DEFAULT_FALLBACK_RADIUS_METERS);
    }

    #[test]
    fn test_settings_keys() {
        assert_eq!(RadiusKind::Attendance.settings_key(), "attendance_radius");
        assert_eq!(RadiusKind::Task.to_string(), "task_radius");
    }
}
