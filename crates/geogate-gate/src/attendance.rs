use crate::affordances::Affordances;
use crate::busy::BusyFlag;
use crate::models::{Evaluation, Transition};
use geogate_core::error::{GeogateError, Result};
use geogate_core::models::{AttendancePhase, AttendanceState, GateAction, Target, TargetBinding};
use geogate_core::ports::AttendanceBackend;
use tracing::info;

/// Nearest target of an evaluation that is inside the radius
fn target_in_range(evaluation: &Evaluation) -> Result<&Target> {
    match (&evaluation.verdict.nearest_target, evaluation.verdict.within_radius) {
        (Some(target), true) => Ok(target),
        _ => Err(evaluation.out_of_range()),
    }
}

fn require_phase(
    state: &AttendanceState,
    action: GateAction,
    required: AttendancePhase,
) -> Result<()> {
    let phase = state.phase();
    if phase == required {
        Ok(())
    } else {
        Err(GeogateError::InvalidTransition { action, phase })
    }
}

/// Decide whether a check-in is permitted, returning the target to check in at
pub fn authorize_check_in<'a>(
    state: &AttendanceState,
    evaluation: &'a Evaluation,
) -> Result<&'a Target> {
    require_phase(state, GateAction::CheckIn, AttendancePhase::NotCheckedIn)?;
    target_in_range(evaluation)
}

/// Decide whether a check-out is permitted, returning the target to check out at
///
/// With [`TargetBinding::SameTarget`] the nearest target must be the one
/// recorded at check-in whenever the backend reports it.
pub fn authorize_check_out<'a>(
    state: &AttendanceState,
    evaluation: &'a Evaluation,
    binding: TargetBinding,
) -> Result<&'a Target> {
    require_phase(state, GateAction::CheckOut, AttendancePhase::CheckedIn)?;
    let target = target_in_range(evaluation)?;

    if let (TargetBinding::SameTarget, Some(checked_in)) = (binding, &state.checked_in_target_id) {
        if *checked_in != target.id {
            return Err(GeogateError::TargetMismatch {
                checked_in: checked_in.clone(),
                nearest: target.id.clone(),
            });
        }
    }

    Ok(target)
}

/// Attendance gate: NotCheckedIn -> CheckedIn -> CheckedOut
///
/// The gate never mutates attendance state. After a successful transition the
/// caller refreshes [`AttendanceState`] from the backend.
pub struct AttendanceGate<B: AttendanceBackend> {
    backend: B,
    binding: TargetBinding,
    busy: BusyFlag,
}

impl<B: AttendanceBackend> AttendanceGate<B> {
    /// Create a new attendance gate
    pub fn new(backend: B, binding: TargetBinding) -> Self {
        Self { backend, binding, busy: BusyFlag::new() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether a check-in or check-out call is pending
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Enabled/disabled signals for the current inputs
    pub fn affordances(&self, state: &AttendanceState, evaluation: &Evaluation) -> Affordances {
        Affordances::compute(state, evaluation, self.binding, self.is_busy())
    }

    /// Check in at the nearest target
    pub async fn check_in(
        &self,
        state: &AttendanceState,
        evaluation: &Evaluation,
    ) -> Result<Transition> {
        let _guard = self.busy.try_acquire(GateAction::CheckIn)?;
        let target = authorize_check_in(state, evaluation)?;

        self.backend.check_in(&target.id, evaluation.position).await?;

        info!(target_id = %target.id, distance_meters = ?evaluation.verdict.distance_meters, "Checked in");
        Ok(transition(GateAction::CheckIn, state, AttendancePhase::CheckedIn, target, evaluation))
    }

    /// Check out at the nearest target
    pub async fn check_out(
        &self,
        state: &AttendanceState,
        evaluation: &Evaluation,
    ) -> Result<Transition> {
        let _guard = self.busy.try_acquire(GateAction::CheckOut)?;
        let target = authorize_check_out(state, evaluation, self.binding)?;

        self.backend.check_out(&target.id, evaluation.position).await?;

        info!(target_id = %target.id, distance_meters = ?evaluation.verdict.distance_meters, "Checked out");
        Ok(transition(GateAction::CheckOut, state, AttendancePhase::CheckedOut, target, evaluation))
    }
}

fn transition(
    action: GateAction,
    state: &AttendanceState,
    to: AttendancePhase,
    target: &Target,
    evaluation: &Evaluation,
) -> Transition {
    Transition {
        action,
        from: state.phase(),
        to,
        target: target.clone(),
        distance_meters: evaluation.verdict.distance_meters.unwrap_or_default(),
    }
}
