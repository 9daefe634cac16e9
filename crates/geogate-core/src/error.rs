//! Error types for GeoGate

use crate::models::{AttendancePhase, GateAction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeogateError {
    // Coordinate errors
    #[error("Invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    // Configuration errors
    #[error("Invalid radius configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Gate verdicts
    #[error("{}", out_of_range_message(.distance_meters, .allowed_meters, .target_label))]
    OutOfRange {
        distance_meters: Option<f64>,
        allowed_meters: f64,
        target_label: Option<String>,
    },

    #[error("Scan code mismatch: expected '{expected}', scanned {}", observed_label(.observed))]
    ScanCodeMismatch {
        expected: String,
        observed: Option<String>,
    },

    #[error("{action} is already in progress")]
    AlreadyInProgress { action: GateAction },

    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        action: GateAction,
        phase: AttendancePhase,
    },

    #[error("Checked in at '{checked_in}' but the nearest location is now '{nearest}'")]
    TargetMismatch { checked_in: String, nearest: String },

    // Collaborator errors
    #[error("Position unavailable: {0}")]
    Position(#[from] PositionError),

    #[error("Backend error during {operation}: {reason}")]
    Backend { operation: String, reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeogateError {
    /// Whether this error is an expected negative verdict rather than a failure
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            GeogateError::OutOfRange { .. }
                | GeogateError::ScanCodeMismatch { .. }
                | GeogateError::AlreadyInProgress { .. }
                | GeogateError::InvalidTransition { .. }
                | GeogateError::TargetMismatch { .. }
        )
    }

    /// Build a backend failure for the named operation
    pub fn backend(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        GeogateError::Backend { operation: operation.into(), reason: reason.into() }
    }
}

/// Rejected radius values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("radius must be a positive finite number of meters, got {value}")]
    NonPositive { value: f64 },

    #[error("radius '{raw}' is not a number")]
    Unparseable { raw: String },
}

/// Failures reported by the device position source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable")]
    Unavailable,

    #[error("location request timed out")]
    Timeout,
}

fn out_of_range_message(distance: &Option<f64>, allowed: &f64, label: &Option<String>) -> String {
    match (distance, label) {
        (Some(d), Some(label)) => {
            format!("Out of range: {d:.1} m from '{label}', allowed radius is {allowed:.1} m")
        }
        (Some(d), None) => format!("Out of range: {d:.1} m away, allowed radius is {allowed:.1} m"),
        (None, _) => format!("Out of range: no location within {allowed:.1} m"),
    }
}

fn observed_label(observed: &Option<String>) -> String {
    match observed {
        Some(code) => format!("'{code}'"),
        None => "nothing".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, GeogateError>;
