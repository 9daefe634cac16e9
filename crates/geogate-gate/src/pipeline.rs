use crate::models::Evaluation;
use geogate_core::error::Result;
use geogate_core::models::{RadiusKind, RadiusPolicy};
use geogate_core::ports::{PositionSource, RadiusSource, TargetDirectory};
use geogate_geo::{refresh_policy, RadiusResolution};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Evaluation pipeline: position source, target directory and radius settings
/// feeding the proximity evaluation
///
/// The pipeline retains the last valid radius policy, so an unusable settings
/// value never replaces a good one. Each evaluation is stamped with an
/// increasing sequence number; callers acting on an evaluation can use
/// [`ProximityPipeline::is_latest`] to discard stale ones.
pub struct ProximityPipeline<P, T, R>
where
    P: PositionSource,
    T: TargetDirectory,
    R: RadiusSource,
{
    position_source: P,
    target_directory: T,
    radius_source: R,
    kind: RadiusKind,
    policy: RwLock<RadiusPolicy>,
    sequence: AtomicU64,
}

impl<P, T, R> ProximityPipeline<P, T, R>
where
    P: PositionSource,
    T: TargetDirectory,
    R: RadiusSource,
{
    /// Create a new pipeline starting from the fallback policy
    pub fn new(
        position_source: P,
        target_directory: T,
        radius_source: R,
        kind: RadiusKind,
        fallback: RadiusPolicy,
    ) -> Self {
        Self {
            position_source,
            target_directory,
            radius_source,
            kind,
            policy: RwLock::new(fallback),
            sequence: AtomicU64::new(0),
        }
    }

    /// Currently retained radius policy
    pub fn policy(&self) -> RadiusPolicy {
        *self.policy.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-read the radius setting and retain the resulting policy
    ///
    /// An unreachable settings source is treated like a missing value.
    pub async fn refresh_policy(&self) -> RadiusResolution {
        let raw = match self.radius_source.raw_radius(self.kind).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "Radius settings unavailable");
                None
            }
        };

        let resolution = refresh_policy(self.policy(), raw.as_deref());
        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = resolution.policy;
        resolution
    }

    /// Run one evaluation against fresh inputs
    ///
    /// The sequence number is taken when the evaluation starts, so an
    /// evaluation that began earlier never supersedes a later one.
    pub async fn evaluate(&self) -> Result<Evaluation> {
        let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;

        let position = self.position_source.current_position().await?;
        let targets = self.target_directory.targets().await?;
        let policy = self.refresh_policy().await.policy;

        let mut evaluation = Evaluation::compute(position, &targets, policy)?;
        evaluation.sequence = sequence;

        debug!(sequence = evaluation.sequence, targets = targets.len(), "Evaluation complete");
        Ok(evaluation)
    }

    /// Whether no evaluation has been started since this one
    pub fn is_latest(&self, evaluation: &Evaluation) -> bool {
        evaluation.sequence == self.sequence.load(Ordering::Acquire)
    }
}
