use crate::distance::distance_meters;
use crate::radius::is_within;
use geogate_core::error::Result;
use geogate_core::models::{Coordinate, ProximityVerdict, RadiusPolicy, Target};
use tracing::debug;

/// Select the nearest usable target and classify it against the policy
///
/// Targets whose coordinate is non-finite or out of range are skipped rather
/// than treated as infinitely far. Ties on the minimal distance go to the
/// target that appears first in `targets`. With no usable target the verdict
/// is empty and not within radius.
///
/// Fails only when `current` itself is not a valid coordinate.
pub fn evaluate(
    current: &Coordinate,
    targets: &[Target],
    policy: &RadiusPolicy,
) -> Result<ProximityVerdict> {
    let current = current.validate()?;

    let mut nearest: Option<(&Target, f64)> = None;
    for target in targets {
        let distance = match distance_meters(&current, &target.coordinate) {
            Ok(distance) => distance,
            Err(e) => {
                debug!(target_id = %target.id, error = %e, "Skipping target without usable coordinate");
                continue;
            }
        };

        // Strict comparison keeps the first of equally distant targets
        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((target, distance));
        }
    }

    let verdict = match nearest {
        Some((target, distance)) => {
            ProximityVerdict::nearest(target.clone(), distance, is_within(distance, policy))
        }
        None => ProximityVerdict::empty(),
    };

    debug!(
        nearest = verdict.target_label(),
        distance_meters = verdict.distance_meters,
        allowed_meters = policy.allowed_meters(),
        within_radius = verdict.within_radius,
        "Evaluated proximity"
    );

    Ok(verdict)
}
