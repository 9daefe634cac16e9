//! Attendance state and gate vocabulary.

use crate::error::{GeogateError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Today's attendance as reported by the attendance backend
///
/// Read-only input to the gates. It changes only through the backend's
/// check-in/check-out calls, after which the caller fetches it again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceState {
    pub has_checked_in: bool,
    pub has_checked_out: bool,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checked_out_at: Option<DateTime<Utc>>,
    /// Target recorded at check-in, when the backend reports it
    #[serde(default)]
    pub checked_in_target_id: Option<String>,
}

impl AttendanceState {
    pub fn not_checked_in() -> Self {
        Self::default()
    }

    pub fn checked_in(target_id: Option<String>) -> Self {
        Self { has_checked_in: true, checked_in_target_id: target_id, ..Default::default() }
    }

    pub fn phase(&self) -> AttendancePhase {
        AttendancePhase::from(self)
    }
}

/// Position in the daily attendance cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendancePhase {
    NotCheckedIn,
    CheckedIn,
    /// Terminal for the day
    CheckedOut,
}

impl From<&AttendanceState> for AttendancePhase {
    fn from(state: &AttendanceState) -> Self {
        if state.has_checked_out {
            AttendancePhase::CheckedOut
        } else if state.has_checked_in {
            AttendancePhase::CheckedIn
        } else {
            AttendancePhase::NotCheckedIn
        }
    }
}

impl fmt::Display for AttendancePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttendancePhase::NotCheckedIn => "not checked in",
            AttendancePhase::CheckedIn => "checked in",
            AttendancePhase::CheckedOut => "checked out",
        })
    }
}

/// Location-sensitive actions guarded by a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateAction {
    CheckIn,
    CheckOut,
    CompleteTask,
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GateAction::CheckIn => "check-in",
            GateAction::CheckOut => "check-out",
            GateAction::CompleteTask => "complete-task",
        })
    }
}

/// How check-out relates to the target used at check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TargetBinding {
    /// Check out against whichever target is nearest now
    Nearest,
    /// Require the nearest target to be the one checked into, when it is known
    #[default]
    SameTarget,
}

impl FromStr for TargetBinding {
    type Err = GeogateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(TargetBinding::Nearest),
            "same-target" | "same_target" | "same" => Ok(TargetBinding::SameTarget),
            _ => Err(GeogateError::ConfigInvalid {
                key: "target_binding".to_string(),
                reason: format!("Invalid target binding: {}. Use nearest or same-target", s),
            }),
        }
    }
}

impl fmt::Display for TargetBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetBinding::Nearest => "nearest",
            TargetBinding::SameTarget => "same-target",
        })
    }
}
