use super::Coordinate;
use serde::{Deserialize, Serialize};

/// A location a worker can be verified against: an asset or a QR-declared position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub label: String,
    pub coordinate: Coordinate,
}

impl Target {
    pub fn new(id: impl Into<String>, label: impl Into<String>, coordinate: Coordinate) -> Self {
        Self { id: id.into(), label: label.into(), coordinate }
    }

    /// Target for a location declared by a scanned code
    pub fn declared(coordinate: Coordinate) -> Self {
        Self::new("declared", "Declared location", coordinate)
    }
}
