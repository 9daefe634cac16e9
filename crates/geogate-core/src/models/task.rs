use super::Coordinate;
use serde::{Deserialize, Serialize};

/// Scan evidence for completing a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskScanState {
    pub scan_code_expected: String,
    #[serde(default)]
    pub scan_code_observed: Option<String>,
    #[serde(default)]
    pub declared_location: Option<Coordinate>,
}

impl TaskScanState {
    pub fn new(expected: impl Into<String>) -> Self {
        Self { scan_code_expected: expected.into(), ..Default::default() }
    }

    pub fn observed(mut self, code: impl Into<String>) -> Self {
        self.scan_code_observed = Some(code.into());
        self
    }

    pub fn declared_at(mut self, location: Coordinate) -> Self {
        self.declared_location = Some(location);
        self
    }

    /// A blank expected code means the task does not ask for a scan
    pub fn scan_required(&self) -> bool {
        !self.scan_code_expected.trim().is_empty()
    }

    /// Exact, case-sensitive match after trimming surrounding whitespace
    pub fn scan_matches(&self) -> bool {
        self.scan_code_observed
            .as_deref()
            .is_some_and(|observed| observed.trim() == self.scan_code_expected.trim())
    }
}

/// Completion submitted to the task backend once the gate has cleared it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCompletion {
    pub task_id: String,
    pub scan_code: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub distance_meters: Option<f64>,
}
