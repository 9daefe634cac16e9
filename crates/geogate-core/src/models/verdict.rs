use super::Target;
use serde::Serialize;

/// Result of a single proximity evaluation
///
/// Derived from its inputs on every evaluation and never cached. `distance_meters`
/// is present exactly when `nearest_target` is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityVerdict {
    pub nearest_target: Option<Target>,
    pub distance_meters: Option<f64>,
    pub within_radius: bool,
}

impl ProximityVerdict {
    /// Verdict when no usable target exists
    pub fn empty() -> Self {
        Self { nearest_target: None, distance_meters: None, within_radius: false }
    }

    pub fn nearest(target: Target, distance_meters: f64, within_radius: bool) -> Self {
        Self { nearest_target: Some(target), distance_meters: Some(distance_meters), within_radius }
    }

    pub fn target_label(&self) -> Option<&str> {
        self.nearest_target.as_ref().map(|t| t.label.as_str())
    }
}
