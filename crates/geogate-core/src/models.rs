pub mod attendance;
pub mod coordinate;
pub mod radius;
pub mod target;
pub mod task;
pub mod verdict;

pub use attendance::{AttendancePhase, AttendanceState, GateAction, TargetBinding};
pub use coordinate::Coordinate;
pub use radius::{RadiusKind, RadiusPolicy, DEFAULT_FALLBACK_RADIUS_METERS};
pub use target::Target;
pub use task::{TaskCompletion, TaskScanState};
pub use verdict::ProximityVerdict;
