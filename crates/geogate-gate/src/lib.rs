//! GeoGate Gate - Action gates for location-sensitive actions
//!
//! This crate turns proximity verdicts into decisions: whether a worker may
//! check in, check out, or complete a task, and performs the backend call for
//! permitted actions while rejecting re-entrant attempts.

pub mod affordances;
pub mod attendance;
pub mod busy;
pub mod models;
pub mod pipeline;
pub mod task;

pub use affordances::{ActionSignal, Affordances};
pub use attendance::{authorize_check_in, authorize_check_out, AttendanceGate};
pub use busy::{BusyFlag, BusyGuard};
pub use models::{Evaluation, TaskClearance, Transition};
pub use pipeline::ProximityPipeline;
pub use task::{verify_task_completion, TaskCompletionGate};
