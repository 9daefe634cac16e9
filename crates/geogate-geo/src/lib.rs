//! GeoGate Geo - Distance, radius policy, and proximity evaluation
//!
//! Everything in this crate is a pure function of its inputs: no I/O, no
//! caching, and no shared state, so evaluations may run concurrently.

pub mod distance;
pub mod proximity;
pub mod radius;
pub mod validation;

pub use distance::{distance_meters, EARTH_RADIUS_METERS};
pub use proximity::evaluate;
pub use radius::{
    is_within, refresh_policy, resolve_radius, update_allowed_radius, FallbackReason,
    RadiusResolution,
};
pub use validation::{validate_targets, RejectedTarget, TargetValidation};
