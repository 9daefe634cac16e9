//! Loading targets from local files

use anyhow::{bail, Context, Result};
use geojson::{feature::Id, Feature, GeoJson};
use geogate_core::models::{Coordinate, Target};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load targets from a GeoJSON document or a JSON array of targets
///
/// GeoJSON features contribute their Point geometry; the label comes from the
/// `name` or `label` property and the id from the feature id or an `id`
/// property. Features without a Point geometry are skipped.
pub fn load_targets(path: &Path) -> Result<Vec<Target>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read targets file {}", path.display()))?;
    parse_targets(&content).with_context(|| format!("Invalid targets file {}", path.display()))
}

pub fn parse_targets(content: &str) -> Result<Vec<Target>> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }

    let features = match GeoJson::from_json_value(value)? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => bail!("Expected a Feature or FeatureCollection, found a bare geometry"),
    };

    Ok(features
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| feature_target(feature, idx))
        .collect())
}

fn feature_target(feature: &Feature, idx: usize) -> Option<Target> {
    let coordinate = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(geojson::Value::Point(position)) if position.len() >= 2 => {
            Coordinate::new(position[1], position[0])
        }
        _ => {
            debug!(feature = idx, "Skipping feature without a Point geometry");
            return None;
        }
    };

    let id = match &feature.id {
        Some(Id::String(s)) => s.clone(),
        Some(Id::Number(n)) => n.to_string(),
        None => property_text(feature, &["id"]).unwrap_or_else(|| format!("feature-{}", idx)),
    };
    let label = property_text(feature, &["name", "label", "title"]).unwrap_or_else(|| id.clone());

    Some(Target::new(id, label, coordinate))
}

fn property_text(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match feature.property(*key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
