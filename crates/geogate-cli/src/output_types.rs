use crate::output::meters;
use chrono::{DateTime, Utc};
use geogate_core::models::{AttendancePhase, Coordinate, GateAction, Target};
use geogate_gate::{Affordances, Evaluation};
use serde::Serialize;
use tabled::Tabled;

/// Output for distance command
#[derive(Debug, Serialize)]
pub struct DistanceOutput {
    pub from: Coordinate,
    pub to: Coordinate,
    pub distance_meters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_radius: Option<bool>,
}

/// Output for evaluate command
#[derive(Debug, Serialize)]
pub struct EvaluateOutput {
    pub position: Coordinate,
    pub allowed_meters: f64,
    pub radius_source: String,
    pub nearest: Option<Target>,
    pub distance_meters: Option<f64>,
    pub within_radius: bool,
    pub targets: Vec<TargetDistanceRow>,
    pub rejected: Vec<RejectedRow>,
}

/// One target with its distance from the evaluated position
#[derive(Debug, Serialize, Tabled)]
pub struct TargetDistanceRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Distance", display_with = "display_meters")]
    pub distance_meters: f64,
    #[tabled(rename = "In Range")]
    pub within_radius: bool,
}

/// A target skipped because of an invalid location
#[derive(Debug, Serialize, Tabled)]
pub struct RejectedRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

/// Output for status command
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub phase: AttendancePhase,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub checked_in_target_id: Option<String>,
    pub evaluation: EvaluationSummary,
    pub actions: Affordances,
}

/// The verdict part of an evaluation
#[derive(Debug, Serialize)]
pub struct EvaluationSummary {
    pub nearest_target: Option<String>,
    pub distance_meters: Option<f64>,
    pub allowed_meters: f64,
    pub within_radius: bool,
}

impl From<&Evaluation> for EvaluationSummary {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            nearest_target: evaluation.verdict.target_label().map(str::to_string),
            distance_meters: evaluation.verdict.distance_meters,
            allowed_meters: evaluation.policy.allowed_meters(),
            within_radius: evaluation.verdict.within_radius,
        }
    }
}

/// Output for check-in and check-out commands
#[derive(Debug, Serialize)]
pub struct TransitionOutput {
    pub action: GateAction,
    pub from: AttendancePhase,
    pub to: AttendancePhase,
    pub target: Target,
    pub distance_meters: f64,
    pub allowed_meters: f64,
}

/// Output for verify-scan and complete-task commands
#[derive(Debug, Serialize)]
pub struct TaskOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub scan_verified: bool,
    pub location_checked: bool,
    pub distance_meters: Option<f64>,
    pub allowed_meters: f64,
    pub submitted: bool,
}

/// One configuration entry
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

fn display_meters(distance: &f64) -> String {
    meters(*distance)
}
