use crate::affordances::ActionSignal;
use crate::busy::BusyFlag;
use crate::models::{Evaluation, TaskClearance};
use geogate_core::error::{GeogateError, PositionError, Result};
use geogate_core::models::{
    Coordinate, GateAction, RadiusPolicy, Target, TaskCompletion, TaskScanState,
};
use geogate_core::ports::TaskBackend;
use tracing::info;

/// Decide whether a task may be completed
///
/// The observed scan code must equal the expected one after trimming
/// surrounding whitespace; the comparison is case sensitive. When the scan
/// declares a location, `current` must be within `policy` of that single
/// location. Without a declared location the scan alone suffices.
pub fn verify_task_completion(
    scan: &TaskScanState,
    current: Option<Coordinate>,
    policy: RadiusPolicy,
) -> Result<TaskClearance> {
    let scan_verified = scan.scan_required();
    if scan_verified && !scan.scan_matches() {
        return Err(GeogateError::ScanCodeMismatch {
            expected: scan.scan_code_expected.trim().to_string(),
            observed: scan.scan_code_observed.clone(),
        });
    }

    let Some(declared) = scan.declared_location else {
        return Ok(TaskClearance { scan_verified, distance_meters: None });
    };

    let declared = declared.validate()?;
    let current = current.ok_or(PositionError::Unavailable)?;
    let evaluation = Evaluation::compute(current, &[Target::declared(declared)], policy)?;

    if !evaluation.verdict.within_radius {
        return Err(evaluation.out_of_range());
    }

    Ok(TaskClearance { scan_verified, distance_meters: evaluation.verdict.distance_meters })
}

/// Task-completion gate: verifies scan and location, then submits the completion
pub struct TaskCompletionGate<B: TaskBackend> {
    backend: B,
    busy: BusyFlag,
}

impl<B: TaskBackend> TaskCompletionGate<B> {
    /// Create a new task-completion gate
    pub fn new(backend: B) -> Self {
        Self { backend, busy: BusyFlag::new() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether a completion submission is pending
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Enabled/disabled signal for completing the task with the current inputs
    pub fn affordance(
        &self,
        scan: &TaskScanState,
        current: Option<Coordinate>,
        policy: RadiusPolicy,
    ) -> ActionSignal {
        if self.is_busy() {
            return ActionSignal::disabled(GeogateError::AlreadyInProgress {
                action: GateAction::CompleteTask,
            });
        }
        ActionSignal::from_decision(verify_task_completion(scan, current, policy))
    }

    /// Load the task's scan requirements and attach the observed code
    pub async fn scan_state(&self, task_id: &str, observed: Option<String>) -> Result<TaskScanState> {
        let mut scan = self.backend.scan_state(task_id).await?;
        scan.scan_code_observed = observed;
        Ok(scan)
    }

    /// Verify and submit a task completion
    pub async fn complete(
        &self,
        task_id: &str,
        scan: &TaskScanState,
        current: Option<Coordinate>,
        policy: RadiusPolicy,
    ) -> Result<TaskCompletion> {
        let _guard = self.busy.try_acquire(GateAction::CompleteTask)?;
        let clearance = verify_task_completion(scan, current, policy)?;

        let completion = TaskCompletion {
            task_id: task_id.to_string(),
            scan_code: scan.scan_code_observed.as_ref().map(|code| code.trim().to_string()),
            coordinate: current,
            distance_meters: clearance.distance_meters,
        };
        self.backend.complete_task(&completion).await?;

        info!(task_id, distance_meters = ?clearance.distance_meters, "Task completed");
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECLARED: Coordinate = Coordinate::new(-8.6705, 115.2126);
    // About 22 m south of DECLARED
    const NEARBY: Coordinate = Coordinate::new(-8.6707, 115.2126);

    fn policy(meters: f64) -> RadiusPolicy {
        RadiusPolicy::new(meters).unwrap()
    }

    #[test]
    fn test_scan_match_without_location() {
        let scan = TaskScanState::new("ABC123").observed("ABC123 ");
        let clearance = verify_task_completion(&scan, None, policy(50.0)).unwrap();
        assert!(clearance.scan_verified);
        assert_eq!(clearance.distance_meters, None);
    }

    #[test]
    fn test_scan_is_case_sensitive() {
        let scan = TaskScanState::new("ABC123").observed("abc123 ");
        let err = verify_task_completion(&scan, None, policy(50.0)).unwrap_err();
        match err {
            GeogateError::ScanCodeMismatch { expected, observed } => {
                assert_eq!(expected, "ABC123");
                assert_eq!(observed.as_deref(), Some("abc123 "));
            }
            other => panic!("Expected ScanCodeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_scan_is_a_mismatch() {
        let scan = TaskScanState::new("ABC123");
        let err = verify_task_completion(&scan, Some(NEARBY), policy(50.0)).unwrap_err();
        assert!(matches!(err, GeogateError::ScanCodeMismatch { observed: None, .. }));
    }

    #[test]
    fn test_scan_checked_before_location() {
        let scan = TaskScanState::new("ABC123").observed("XYZ").declared_at(DECLARED);
        let err = verify_task_completion(&scan, Some(NEARBY), policy(5.0)).unwrap_err();
        assert!(matches!(err, GeogateError::ScanCodeMismatch { .. }));
    }

    #[test]
    fn test_declared_location_within_radius() {
        let scan = TaskScanState::new("ABC123").observed("ABC123").declared_at(DECLARED);
        let clearance = verify_task_completion(&scan, Some(NEARBY), policy(50.0)).unwrap();
        let distance = clearance.distance_meters.unwrap();
        assert!(distance > 20.0 && distance < 25.0, "got {}", distance);
    }

    #[test]
    fn test_declared_location_out_of_range() {
        let scan = TaskScanState::new("ABC123").observed("ABC123").declared_at(DECLARED);
        let err = verify_task_completion(&scan, Some(NEARBY), policy(5.0)).unwrap_err();
        assert!(matches!(
            err,
            GeogateError::OutOfRange { distance_meters: Some(_), allowed_meters, .. } if allowed_meters == 5.0
        ));
    }

    #[test]
    fn test_declared_location_needs_position() {
        let scan = TaskScanState::new("ABC123").observed("ABC123").declared_at(DECLARED);
        let err = verify_task_completion(&scan, None, policy(50.0)).unwrap_err();
        assert!(matches!(err, GeogateError::Position(PositionError::Unavailable)));
    }

    #[test]
    fn test_invalid_declared_location_is_surfaced() {
        let scan = TaskScanState::new("ABC123")
            .observed("ABC123")
            .declared_at(Coordinate::new(-108.0, 115.0));
        let err = verify_task_completion(&scan, Some(NEARBY), policy(50.0)).unwrap_err();
        assert!(matches!(err, GeogateError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_no_scan_required() {
        let scan = TaskScanState::new("").declared_at(DECLARED);
        let clearance = verify_task_completion(&scan, Some(NEARBY), policy(50.0)).unwrap();
        assert!(!clearance.scan_verified);
        assert!(clearance.distance_meters.is_some());
    }
}
