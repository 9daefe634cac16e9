//! Command implementations

mod attendance;
mod config;
mod distance;
mod evaluate;
mod task;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use anyhow::Result;
use geogate_core::config::LayeredConfig;
use geogate_core::models::{Coordinate, RadiusKind, RadiusPolicy};
use geogate_core::ports::RadiusSource;
use geogate_gate::ProximityPipeline;
use geogate_geo::{resolve_radius, RadiusResolution};
use geogate_http::HttpBackend;
use geogate_store::FixedPositionSource;
use tracing::warn;

/// Execute a CLI command
pub async fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(&cli)?;

    match cli.command {
        Commands::Distance(args) => distance::execute(args, output),
        Commands::Evaluate(args) => evaluate::execute(args, &config, output).await,
        Commands::Status(args) => attendance::status(args, &config, output).await,
        Commands::CheckIn(args) => attendance::check_in(args, &config, output).await,
        Commands::CheckOut(args) => attendance::check_out(args, &config, output).await,
        Commands::VerifyScan(args) => task::verify_scan(args, &config, output),
        Commands::CompleteTask(args) => task::complete_task(args, &config, output).await,
        Commands::Config => config::execute(&config, output),
    }
}

type ApiPipeline = ProximityPipeline<FixedPositionSource, HttpBackend, HttpBackend>;

/// Pipeline over the facility API for a position given on the command line
fn api_pipeline(
    backend: &HttpBackend,
    at: Coordinate,
    kind: RadiusKind,
    config: &LayeredConfig,
) -> ApiPipeline {
    ProximityPipeline::new(
        FixedPositionSource::new(at),
        backend.clone(),
        backend.clone(),
        kind,
        config.fallback_policy(),
    )
}

/// Read a radius setting from the API, tolerating an unreachable settings endpoint
async fn remote_radius(
    backend: &HttpBackend,
    kind: RadiusKind,
    fallback: RadiusPolicy,
) -> RadiusResolution {
    let raw = match backend.raw_radius(kind).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(kind = %kind, error = %e, "Radius settings unavailable");
            None
        }
    };
    resolve_radius(raw.as_deref(), fallback)
}

/// Human-readable description of where a radius came from
fn radius_source(resolution: &RadiusResolution) -> &'static str {
    if resolution.used_fallback() {
        "fallback"
    } else {
        "api setting"
    }
}
