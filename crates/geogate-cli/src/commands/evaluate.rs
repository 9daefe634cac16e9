//! Evaluate command implementation

use super::{radius_source, remote_radius};
use crate::cli::EvaluateArgs;
use crate::output::{maybe_meters, meters, OutputWriter};
use crate::output_types::{EvaluateOutput, RejectedRow, TargetDistanceRow};
use crate::targets::load_targets;
use anyhow::Result;
use geogate_core::config::LayeredConfig;
use geogate_core::models::{RadiusKind, Target};
use geogate_core::ports::TargetDirectory;
use geogate_gate::Evaluation;
use geogate_geo::{distance_meters, is_within, validate_targets};
use geogate_http::HttpBackend;

pub async fn execute(args: EvaluateArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let at = args.at.validate()?;
    let kind = RadiusKind::from(args.kind);
    let backend = match args.targets {
        Some(_) => None,
        None => Some(HttpBackend::from_config(config)?),
    };

    let targets = match (&args.targets, &backend) {
        (Some(path), _) => load_targets(path)?,
        (None, Some(backend)) => backend.targets().await?,
        (None, None) => Vec::new(),
    };

    let (policy, source) = match (args.radius, &backend) {
        (Some(policy), _) => (policy, "command line"),
        (None, Some(backend)) => {
            let resolution = remote_radius(backend, kind, config.fallback_policy()).await;
            (resolution.policy, radius_source(&resolution))
        }
        (None, None) => (config.fallback_policy(), "fallback"),
    };

    let evaluation = Evaluation::compute(at, &targets, policy)?;

    let validation = validate_targets(&targets);
    let rejected: Vec<RejectedRow> = validation
        .rejected
        .into_iter()
        .map(|r| RejectedRow { id: r.id, label: r.label, reason: r.reason })
        .collect();
    let rows = distance_rows(&evaluation, &targets);

    if output.is_json() {
        return output.result(EvaluateOutput {
            position: at,
            allowed_meters: policy.allowed_meters(),
            radius_source: source.to_string(),
            nearest: evaluation.verdict.nearest_target.clone(),
            distance_meters: evaluation.verdict.distance_meters,
            within_radius: evaluation.verdict.within_radius,
            targets: rows,
            rejected,
        });
    }

    output.section("Evaluation");
    output.kv("Position", at);
    output.kv("Allowed radius", format!("{} ({})", meters(policy.allowed_meters()), source));
    output.kv("Nearest", evaluation.verdict.target_label().unwrap_or("-"));
    output.kv("Distance", maybe_meters(evaluation.verdict.distance_meters));

    output.section("Targets");
    output.table(rows);

    if !rejected.is_empty() {
        output.warning(format!("{} target(s) skipped for invalid locations", rejected.len()));
        output.table(rejected);
    }

    if evaluation.verdict.within_radius {
        output.success("Within range");
    } else {
        output.warning("Out of range");
    }

    Ok(())
}

/// Usable targets ordered by distance from the evaluated position
fn distance_rows(evaluation: &Evaluation, targets: &[Target]) -> Vec<TargetDistanceRow> {
    let mut rows: Vec<TargetDistanceRow> = targets
        .iter()
        .filter_map(|target| {
            let distance = distance_meters(&evaluation.position, &target.coordinate).ok()?;
            Some(TargetDistanceRow {
                id: target.id.clone(),
                label: target.label.clone(),
                distance_meters: distance,
                within_radius: is_within(distance, &evaluation.policy),
            })
        })
        .collect();

    rows.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use geogate_core::models::{Coordinate, RadiusPolicy};

    #[test]
    fn test_distance_rows_sorted_and_filtered() {
        let at = Coordinate::new(0.0, 0.0);
        let targets = vec![
            Target::new("far", "Far", Coordinate::new(0.01, 0.0)),
            Target::new("bad", "Bad", Coordinate::new(95.0, 0.0)),
            Target::new("near", "Near", Coordinate::new(0.0001, 0.0)),
        ];
        let evaluation =
            Evaluation::compute(at, &targets, RadiusPolicy::new(50.0).unwrap()).unwrap();

        let rows = distance_rows(&evaluation, &targets);

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert!(rows[0].within_radius);
        assert!(!rows[1].within_radius);
    }
}
