//! Task commands: offline scan verification and task completion

use super::remote_radius;
use crate::cli::{CompleteTaskArgs, VerifyScanArgs};
use crate::output::{maybe_meters, meters, OutputWriter};
use crate::output_types::TaskOutput;
use anyhow::Result;
use geogate_core::config::LayeredConfig;
use geogate_core::models::{Coordinate, RadiusKind, TaskScanState};
use geogate_gate::{verify_task_completion, TaskCompletionGate};
use geogate_http::HttpBackend;

pub fn verify_scan(args: VerifyScanArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let policy = args.radius.unwrap_or_else(|| config.fallback_policy());
    let current = args.at.map(Coordinate::validate).transpose()?;

    let mut scan = TaskScanState::new(args.expected);
    scan.scan_code_observed = args.observed;
    scan.declared_location = args.declared;

    let clearance = verify_task_completion(&scan, current, policy)?;

    if output.is_json() {
        return output.result(TaskOutput {
            task_id: None,
            scan_verified: clearance.scan_verified,
            location_checked: scan.declared_location.is_some(),
            distance_meters: clearance.distance_meters,
            allowed_meters: policy.allowed_meters(),
            submitted: false,
        });
    }

    if clearance.scan_verified {
        output.success("Scan code matches");
    } else {
        output.info("No scan code required");
    }
    if let Some(distance) = clearance.distance_meters {
        output.success(format!(
            "Within {} of the declared location ({} away)",
            meters(policy.allowed_meters()),
            meters(distance)
        ));
    }

    Ok(())
}

pub async fn complete_task(
    args: CompleteTaskArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let current = args.at.map(Coordinate::validate).transpose()?;
    let backend = HttpBackend::from_config(config)?;
    let resolution = remote_radius(&backend, RadiusKind::Task, config.fallback_policy()).await;
    let policy = resolution.policy;

    let gate = TaskCompletionGate::new(backend);
    let scan = gate.scan_state(&args.task_id, args.scan).await?;
    let completion = gate.complete(&args.task_id, &scan, current, policy).await?;

    if output.is_json() {
        return output.result(TaskOutput {
            task_id: Some(completion.task_id),
            scan_verified: scan.scan_required(),
            location_checked: scan.declared_location.is_some(),
            distance_meters: completion.distance_meters,
            allowed_meters: policy.allowed_meters(),
            submitted: true,
        });
    }

    output.success(format!("Task {} completed", completion.task_id));
    if scan.declared_location.is_some() {
        output.kv("Distance", maybe_meters(completion.distance_meters));
        output.kv("Allowed radius", meters(policy.allowed_meters()));
    }

    Ok(())
}
