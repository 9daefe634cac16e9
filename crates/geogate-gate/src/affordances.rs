//! Enabled/disabled signals a UI renders for the gated actions.

use crate::attendance::{authorize_check_in, authorize_check_out};
use crate::models::Evaluation;
use geogate_core::error::{GeogateError, Result};
use geogate_core::models::{AttendanceState, GateAction, TargetBinding};
use serde::Serialize;

/// Whether one action is currently available, and why not if it isn't
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSignal {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ActionSignal {
    pub(crate) fn from_decision<T>(decision: Result<T>) -> Self {
        match decision {
            Ok(_) => Self { enabled: true, reason: None },
            Err(e) => Self::disabled(e),
        }
    }

    pub(crate) fn disabled(reason: GeogateError) -> Self {
        Self { enabled: false, reason: Some(reason.to_string()) }
    }
}

/// Signals for both attendance actions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Affordances {
    pub check_in: ActionSignal,
    pub check_out: ActionSignal,
}

impl Affordances {
    pub fn compute(
        state: &AttendanceState,
        evaluation: &Evaluation,
        binding: TargetBinding,
        busy: bool,
    ) -> Self {
        if busy {
            return Self {
                check_in: ActionSignal::disabled(GeogateError::AlreadyInProgress {
                    action: GateAction::CheckIn,
                }),
                check_out: ActionSignal::disabled(GeogateError::AlreadyInProgress {
                    action: GateAction::CheckOut,
                }),
            };
        }

        Self {
            check_in: ActionSignal::from_decision(authorize_check_in(state, evaluation)),
            check_out: ActionSignal::from_decision(authorize_check_out(state, evaluation, binding)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geogate_core::models::{Coordinate, RadiusPolicy, Target};

    fn evaluation(allowed: f64) -> Evaluation {
        let lobby = Coordinate::new(-8.6705, 115.2126);
        let worker = Coordinate::new(-8.6707, 115.2126);
        Evaluation::compute(
            worker,
            &[Target::new("lobby", "Lobby", lobby)],
            RadiusPolicy::new(allowed).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_only_check_in_before_attendance() {
        let affordances = Affordances::compute(
            &AttendanceState::not_checked_in(),
            &evaluation(50.0),
            TargetBinding::SameTarget,
            false,
        );
        assert!(affordances.check_in.enabled);
        assert!(!affordances.check_out.enabled);
        assert!(affordances.check_out.reason.unwrap().contains("not checked in"));
    }

    #[test]
    fn test_out_of_range_disables_both() {
        let affordances = Affordances::compute(
            &AttendanceState::checked_in(None),
            &evaluation(5.0),
            TargetBinding::SameTarget,
            false,
        );
        assert!(!affordances.check_in.enabled);
        assert!(!affordances.check_out.enabled);
        assert!(affordances.check_out.reason.unwrap().contains("Out of range"));
    }

    #[test]
    fn test_busy_disables_everything() {
        let affordances = Affordances::compute(
            &AttendanceState::not_checked_in(),
            &evaluation(50.0),
            TargetBinding::SameTarget,
            true,
        );
        assert!(!affordances.check_in.enabled);
        assert!(!affordances.check_out.enabled);
    }

    #[test]
    fn test_serializes_as_flags() {
        let affordances = Affordances::compute(
            &AttendanceState::not_checked_in(),
            &evaluation(50.0),
            TargetBinding::SameTarget,
            false,
        );
        let json = serde_json::to_value(&affordances).unwrap();
        assert_eq!(json["check_in"]["enabled"], true);
        assert!(json["check_in"].get("reason").is_none());
        assert_eq!(json["check_out"]["enabled"], false);
    }
}
