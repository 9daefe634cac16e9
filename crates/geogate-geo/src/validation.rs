use geogate_core::models::Target;
use serde::Serialize;

/// Summary of which targets carry a usable coordinate
#[derive(Debug, Clone, Default, Serialize)]
pub struct TargetValidation {
    pub usable: usize,
    pub rejected: Vec<RejectedTarget>,
}

/// A target that proximity evaluation will skip
#[derive(Debug, Clone, Serialize)]
pub struct RejectedTarget {
    pub id: String,
    pub label: String,
    pub reason: String,
}

impl TargetValidation {
    pub fn is_valid(&self) -> bool {
        self.rejected.is_empty()
    }

    fn reject(&mut self, target: &Target, reason: String) {
        self.rejected.push(RejectedTarget {
            id: target.id.clone(),
            label: target.label.clone(),
            reason,
        });
    }
}

/// Check every target's coordinate against the range invariant
pub fn validate_targets(targets: &[Target]) -> TargetValidation {
    let mut result = TargetValidation::default();

    for target in targets {
        match target.coordinate.validate() {
            Ok(_) => result.usable += 1,
            Err(e) => result.reject(target, e.to_string()),
        }
    }

    result
}
