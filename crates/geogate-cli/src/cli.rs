use clap::{Parser, Subcommand};
use geogate_core::config::parse_radius;
use geogate_core::error::GeogateError;
use geogate_core::models::{Coordinate, RadiusKind, RadiusPolicy, TargetBinding};
use std::path::PathBuf;

/// GeoGate - Geofenced attendance and task verification
#[derive(Parser, Debug)]
#[command(name = "geogate")]
#[command(about = "Geofenced attendance and task verification", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geogate.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the facility API
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Radius in meters used when the configured radius is missing or invalid
    #[arg(long, global = true, value_name = "METERS", value_parser = parse_radius)]
    pub fallback_radius: Option<RadiusPolicy>,

    /// Which target a check-out must be near (nearest or same-target)
    #[arg(long, global = true, value_name = "BINDING")]
    pub binding: Option<TargetBinding>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Great-circle distance between two coordinates
    Distance(DistanceArgs),

    /// Find the nearest target to a position and check it against the radius
    Evaluate(EvaluateArgs),

    /// Show today's attendance and which actions are available
    Status(PositionArgs),

    /// Check in at the nearest target
    CheckIn(PositionArgs),

    /// Check out at the nearest target
    CheckOut(PositionArgs),

    /// Verify a scanned code and optional declared location without submitting
    VerifyScan(VerifyScanArgs),

    /// Verify and submit a task completion
    CompleteTask(CompleteTaskArgs),

    /// Show effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct DistanceArgs {
    /// First coordinate as "latitude,longitude"
    #[arg(allow_hyphen_values = true, value_parser = parse_coordinate)]
    pub from: Coordinate,

    /// Second coordinate as "latitude,longitude"
    #[arg(allow_hyphen_values = true, value_parser = parse_coordinate)]
    pub to: Coordinate,

    /// Also report whether the distance is within this radius
    #[arg(long, value_name = "METERS", value_parser = parse_radius)]
    pub radius: Option<RadiusPolicy>,
}

#[derive(Parser, Debug)]
pub struct PositionArgs {
    /// Current position as "latitude,longitude"
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    pub at: Coordinate,
}

#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Current position as "latitude,longitude"
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    pub at: Coordinate,

    /// Targets file (GeoJSON point features or a JSON array of targets).
    /// Targets are fetched from the API when omitted.
    #[arg(long, value_name = "PATH")]
    pub targets: Option<PathBuf>,

    /// Allowed radius in meters, overriding the configured setting
    #[arg(long, value_name = "METERS", value_parser = parse_radius)]
    pub radius: Option<RadiusPolicy>,

    /// Which radius setting to read from the API
    #[arg(long, value_enum, default_value = "attendance")]
    pub kind: RadiusKindArg,
}

#[derive(Parser, Debug)]
pub struct VerifyScanArgs {
    /// Code the task expects; an empty code requires no scan
    #[arg(long, allow_hyphen_values = true)]
    pub expected: String,

    /// Code that was scanned
    #[arg(long, allow_hyphen_values = true)]
    pub observed: Option<String>,

    /// Location declared for the task as "latitude,longitude"
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    pub declared: Option<Coordinate>,

    /// Current position as "latitude,longitude"
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    pub at: Option<Coordinate>,

    /// Allowed radius in meters (defaults to the fallback radius)
    #[arg(long, value_name = "METERS", value_parser = parse_radius)]
    pub radius: Option<RadiusPolicy>,
}

#[derive(Parser, Debug)]
pub struct CompleteTaskArgs {
    /// Task identifier
    pub task_id: String,

    /// Code that was scanned
    #[arg(long, allow_hyphen_values = true)]
    pub scan: Option<String>,

    /// Current position as "latitude,longitude"
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    pub at: Option<Coordinate>,
}

/// Parse a coordinate without the range check; commands report out-of-range values
fn parse_coordinate(s: &str) -> Result<Coordinate, GeogateError> {
    Coordinate::parse_unchecked(s)
}

/// Radius setting selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RadiusKindArg {
    /// Attendance check-in/check-out radius
    Attendance,
    /// Task completion radius
    Task,
}

impl From<RadiusKindArg> for RadiusKind {
    fn from(kind: RadiusKindArg) -> Self {
        match kind {
            RadiusKindArg::Attendance => RadiusKind::Attendance,
            RadiusKindArg::Task => RadiusKind::Task,
        }
    }
}
