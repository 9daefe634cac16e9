//! Port trait definitions
//!
//! These traits define the external collaborators that adapters must implement.

pub mod backend;
pub mod location;

pub use backend::{AttendanceBackend, TaskBackend};
pub use location::{PositionSource, RadiusSource, TargetDirectory};
