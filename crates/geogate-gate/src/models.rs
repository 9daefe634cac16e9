use geogate_core::error::Result;
use geogate_core::models::{
    AttendancePhase, Coordinate, GateAction, ProximityVerdict, RadiusPolicy, Target,
};
use serde::Serialize;

/// A proximity verdict together with the inputs it was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Monotonic stamp assigned by the pipeline; zero for standalone evaluations
    pub sequence: u64,
    pub position: Coordinate,
    pub policy: RadiusPolicy,
    pub verdict: ProximityVerdict,
}

impl Evaluation {
    /// Evaluate `position` against `targets` outside of a pipeline
    pub fn compute(position: Coordinate, targets: &[Target], policy: RadiusPolicy) -> Result<Self> {
        let verdict = geogate_geo::evaluate(&position, targets, &policy)?;
        Ok(Self { sequence: 0, position, policy, verdict })
    }

    /// Negative verdict payload for the current evaluation
    pub(crate) fn out_of_range(&self) -> geogate_core::GeogateError {
        geogate_core::GeogateError::OutOfRange {
            distance_meters: self.verdict.distance_meters,
            allowed_meters: self.policy.allowed_meters(),
            target_label: self.verdict.target_label().map(str::to_string),
        }
    }
}

/// A performed attendance transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub action: GateAction,
    pub from: AttendancePhase,
    pub to: AttendancePhase,
    pub target: Target,
    pub distance_meters: f64,
}

/// Why a task completion was allowed through
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskClearance {
    /// The scanned code was compared and matched
    pub scan_verified: bool,
    /// Distance to the declared location, when one was required
    pub distance_meters: Option<f64>,
}
