//! Attendance commands: status, check-in and check-out

use super::api_pipeline;
use crate::cli::PositionArgs;
use crate::output::{maybe_meters, meters, OutputWriter};
use crate::output_types::{EvaluationSummary, StatusOutput, TransitionOutput};
use anyhow::Result;
use geogate_core::config::LayeredConfig;
use geogate_core::models::{GateAction, RadiusKind};
use geogate_core::ports::AttendanceBackend;
use geogate_gate::{ActionSignal, AttendanceGate, Transition};
use geogate_http::HttpBackend;

pub async fn status(args: PositionArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let at = args.at.validate()?;
    let backend = HttpBackend::from_config(config)?;
    let pipeline = api_pipeline(&backend, at, RadiusKind::Attendance, config);
    let gate = AttendanceGate::new(backend, config.target_binding.value);

    let state = gate.backend().today().await?;
    let evaluation = pipeline.evaluate().await?;
    let actions = gate.affordances(&state, &evaluation);
    let summary = EvaluationSummary::from(&evaluation);

    if output.is_json() {
        return output.result(StatusOutput {
            phase: state.phase(),
            checked_in_at: state.checked_in_at,
            checked_out_at: state.checked_out_at,
            checked_in_target_id: state.checked_in_target_id,
            evaluation: summary,
            actions,
        });
    }

    output.section("Attendance");
    output.kv("Today", state.phase());
    if let Some(at) = state.checked_in_at {
        output.kv("Checked in at", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(at) = state.checked_out_at {
        output.kv("Checked out at", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    output.section("Location");
    output.kv("Nearest", summary.nearest_target.as_deref().unwrap_or("-"));
    output.kv("Distance", maybe_meters(summary.distance_meters));
    output.kv("Allowed radius", meters(summary.allowed_meters));

    output.section("Actions");
    print_signal(output, GateAction::CheckIn, &actions.check_in);
    print_signal(output, GateAction::CheckOut, &actions.check_out);

    Ok(())
}

pub async fn check_in(args: PositionArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    perform(GateAction::CheckIn, args, config, output).await
}

pub async fn check_out(args: PositionArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    perform(GateAction::CheckOut, args, config, output).await
}

async fn perform(
    action: GateAction,
    args: PositionArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let at = args.at.validate()?;
    let backend = HttpBackend::from_config(config)?;
    let pipeline = api_pipeline(&backend, at, RadiusKind::Attendance, config);
    let gate = AttendanceGate::new(backend, config.target_binding.value);

    let state = gate.backend().today().await?;
    let evaluation = pipeline.evaluate().await?;

    let transition: Transition = match action {
        GateAction::CheckOut => gate.check_out(&state, &evaluation).await?,
        _ => gate.check_in(&state, &evaluation).await?,
    };

    if output.is_json() {
        return output.result(TransitionOutput {
            action: transition.action,
            from: transition.from,
            to: transition.to,
            target: transition.target,
            distance_meters: transition.distance_meters,
            allowed_meters: evaluation.policy.allowed_meters(),
        });
    }

    output.success(format!(
        "{} at {} ({} away, allowed {})",
        match transition.action {
            GateAction::CheckOut => "Checked out",
            _ => "Checked in",
        },
        transition.target.label,
        meters(transition.distance_meters),
        meters(evaluation.policy.allowed_meters()),
    ));
    output.kv("Today", transition.to);

    Ok(())
}

fn print_signal(output: &OutputWriter, action: GateAction, signal: &ActionSignal) {
    match &signal.reason {
        None => output.success(format!("{}: available", action)),
        Some(reason) => output.info(format!("{}: unavailable ({})", action, reason)),
    }
}
