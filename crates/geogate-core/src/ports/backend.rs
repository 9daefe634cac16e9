use crate::error::Result;
use crate::models::{AttendanceState, Coordinate, TaskCompletion, TaskScanState};
use async_trait::async_trait;

/// Port for the attendance backend
#[async_trait]
pub trait AttendanceBackend: Send + Sync {
    /// Today's attendance for the current worker
    async fn today(&self) -> Result<AttendanceState>;

    /// Record a check-in at the given target
    async fn check_in(&self, target_id: &str, at: Coordinate) -> Result<()>;

    /// Record a check-out at the given target
    async fn check_out(&self, target_id: &str, at: Coordinate) -> Result<()>;
}

/// Port for the task backend
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Expected scan code and declared location for a task
    ///
    /// The returned state carries no observed code.
    async fn scan_state(&self, task_id: &str) -> Result<TaskScanState>;

    /// Submit a completion that has cleared the gate
    async fn complete_task(&self, completion: &TaskCompletion) -> Result<()>;
}
