//! In-memory collaborator implementations for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use the HTTP backend.

use async_trait::async_trait;
use chrono::Utc;
use geogate_core::error::{GeogateError, PositionError, Result};
use geogate_core::models::{
    AttendancePhase, AttendanceState, Coordinate, GateAction, RadiusKind, Target,
    TaskCompletion, TaskScanState,
};
use geogate_core::ports::{
    AttendanceBackend, PositionSource, RadiusSource, TargetDirectory, TaskBackend,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Notify;

/// A check-in or check-out received by [`MemoryAttendanceBackend`]
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceCall {
    pub action: GateAction,
    pub target_id: String,
    pub at: Coordinate,
}

/// In-memory implementation of AttendanceBackend
///
/// Applies transitions to its own state the way the real backend would, and
/// rejects transitions that do not fit today's state.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttendanceBackend {
    state: Arc<RwLock<AttendanceState>>,
    calls: Arc<RwLock<Vec<AttendanceCall>>>,
    hold: Arc<RwLock<Option<Arc<Notify>>>>,
}

impl MemoryAttendanceBackend {
    /// Create a new in-memory attendance backend with no attendance today
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend starting from the given state
    pub fn with_state(state: AttendanceState) -> Self {
        let backend = Self::new();
        *backend.state.write().unwrap() = state;
        backend
    }

    /// Current state, without going through the port
    pub fn state(&self) -> AttendanceState {
        self.state.read().unwrap().clone()
    }

    /// Every check-in/check-out call received so far
    pub fn calls(&self) -> Vec<AttendanceCall> {
        self.calls.read().unwrap().clone()
    }

    /// Make subsequent calls wait until the returned handle is notified
    pub fn hold_calls(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.write().unwrap() = Some(notify.clone());
        notify
    }

    async fn record(&self, action: GateAction, target_id: &str, at: Coordinate) -> Result<()> {
        self.calls.write().unwrap().push(AttendanceCall {
            action,
            target_id: target_id.to_string(),
            at,
        });

        let hold = self.hold.read().unwrap().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        let mut state = self.state.write().unwrap();
        match (action, state.phase()) {
            (GateAction::CheckIn, AttendancePhase::NotCheckedIn) => {
                state.has_checked_in = true;
                state.checked_in_at = Some(Utc::now());
                state.checked_in_target_id = Some(target_id.to_string());
                Ok(())
            }
            (GateAction::CheckOut, AttendancePhase::CheckedIn) => {
                state.has_checked_out = true;
                state.checked_out_at = Some(Utc::now());
                Ok(())
            }
            (action, phase) => {
                Err(GeogateError::backend(action.to_string(), format!("rejected while {}", phase)))
            }
        }
    }
}

#[async_trait]
impl AttendanceBackend for MemoryAttendanceBackend {
    async fn today(&self) -> Result<AttendanceState> {
        Ok(self.state())
    }

    async fn check_in(&self, target_id: &str, at: Coordinate) -> Result<()> {
        self.record(GateAction::CheckIn, target_id, at).await
    }

    async fn check_out(&self, target_id: &str, at: Coordinate) -> Result<()> {
        self.record(GateAction::CheckOut, target_id, at).await
    }
}

/// In-memory implementation of TaskBackend
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskBackend {
    tasks: Arc<RwLock<HashMap<String, TaskScanState>>>,
    completions: Arc<RwLock<Vec<TaskCompletion>>>,
    hold: Arc<RwLock<Option<Arc<Notify>>>>,
}

impl MemoryTaskBackend {
    /// Create a new in-memory task backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task's scan requirements
    pub fn insert_task(&self, task_id: impl Into<String>, scan: TaskScanState) {
        self.tasks.write().unwrap().insert(task_id.into(), scan);
    }

    /// Completions received so far
    pub fn completions(&self) -> Vec<TaskCompletion> {
        self.completions.read().unwrap().clone()
    }

    /// Make subsequent completions wait until the returned handle is notified
    pub fn hold_calls(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.write().unwrap() = Some(notify.clone());
        notify
    }
}

#[async_trait]
impl TaskBackend for MemoryTaskBackend {
    async fn scan_state(&self, task_id: &str) -> Result<TaskScanState> {
        let tasks = self.tasks.read().unwrap();
        tasks
            .get(task_id)
            .map(|scan| TaskScanState { scan_code_observed: None, ..scan.clone() })
            .ok_or_else(|| GeogateError::backend("scan-state", format!("task {} not found", task_id)))
    }

    async fn complete_task(&self, completion: &TaskCompletion) -> Result<()> {
        let hold = self.hold.read().unwrap().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        if !self.tasks.read().unwrap().contains_key(&completion.task_id) {
            return Err(GeogateError::backend(
                "complete-task",
                format!("task {} not found", completion.task_id),
            ));
        }

        let mut completions = self.completions.write().unwrap();
        if completions.iter().any(|c| c.task_id == completion.task_id) {
            return Err(GeogateError::backend(
                "complete-task",
                format!("task {} is already completed", completion.task_id),
            ));
        }
        completions.push(completion.clone());
        Ok(())
    }
}

/// Target directory over a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticTargetDirectory {
    targets: Arc<Vec<Target>>,
}

impl StaticTargetDirectory {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets: Arc::new(targets) }
    }
}

#[async_trait]
impl TargetDirectory for StaticTargetDirectory {
    async fn targets(&self) -> Result<Vec<Target>> {
        Ok(self.targets.as_ref().clone())
    }
}

/// Position source reporting a settable reading
#[derive(Debug, Clone)]
pub struct FixedPositionSource {
    reading: Arc<RwLock<std::result::Result<Coordinate, PositionError>>>,
}

impl FixedPositionSource {
    pub fn new(position: Coordinate) -> Self {
        Self { reading: Arc::new(RwLock::new(Ok(position))) }
    }

    pub fn move_to(&self, position: Coordinate) {
        *self.reading.write().unwrap() = Ok(position);
    }

    pub fn fail_with(&self, error: PositionError) {
        *self.reading.write().unwrap() = Err(error);
    }
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn current_position(&self) -> std::result::Result<Coordinate, PositionError> {
        *self.reading.read().unwrap()
    }
}

/// Radius settings held in memory as raw strings
#[derive(Debug, Clone, Default)]
pub struct StaticRadiusSource {
    values: Arc<RwLock<HashMap<RadiusKind, String>>>,
    unavailable: Arc<RwLock<bool>>,
}

impl StaticRadiusSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, kind: RadiusKind, raw: impl Into<String>) -> Self {
        self.set(kind, raw);
        self
    }

    pub fn set(&self, kind: RadiusKind, raw: impl Into<String>) {
        self.values.write().unwrap().insert(kind, raw.into());
    }

    pub fn clear(&self, kind: RadiusKind) {
        self.values.write().unwrap().remove(&kind);
    }

    /// Make reads fail as if the settings service were down
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().unwrap() = unavailable;
    }
}

#[async_trait]
impl RadiusSource for StaticRadiusSource {
    async fn raw_radius(&self, kind: RadiusKind) -> Result<Option<String>> {
        if *self.unavailable.read().unwrap() {
            return Err(GeogateError::backend("settings", "settings service unavailable"));
        }
        Ok(self.values.read().unwrap().get(&kind).cloned())
    }
}
