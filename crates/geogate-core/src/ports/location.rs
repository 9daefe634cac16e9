use crate::error::{PositionError, Result};
use crate::models::{Coordinate, RadiusKind, Target};
use async_trait::async_trait;

/// Port for the device's geolocation
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Read the current position
    async fn current_position(&self) -> std::result::Result<Coordinate, PositionError>;
}

/// Port for the locations a worker may be verified against
#[async_trait]
pub trait TargetDirectory: Send + Sync {
    /// List the current targets, in the directory's order
    async fn targets(&self) -> Result<Vec<Target>>;
}

/// Port for the radius settings
#[async_trait]
pub trait RadiusSource: Send + Sync {
    /// Raw configured value for the given radius, `None` when unset
    async fn raw_radius(&self, kind: RadiusKind) -> Result<Option<String>>;
}
