use console::style;
use geogate_core::error::{GeogateError, PositionError};
use std::fmt;
use std::process::ExitCode;

/// Error presentation with suggestions
pub struct CliError {
    pub message: String,
    pub kind: &'static str,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
    pub exit_code: u8,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: "error",
            context: None,
            suggestions: Vec::new(),
            help_command: None,
            exit_code: 1,
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    /// Denied actions exit with 3, every other failure with 1 (clap uses 2 for usage errors)
    pub fn denied(mut self) -> Self {
        self.exit_code = 3;
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code)
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Convert a command failure into a presentable error
pub fn from_anyhow(error: &anyhow::Error) -> CliError {
    match error.downcast_ref::<GeogateError>() {
        Some(e) => from_geogate(e),
        None => CliError::new(format!("{:#}", error)),
    }
}

fn from_geogate(error: &GeogateError) -> CliError {
    let base = CliError::new(error.to_string());

    match error {
        GeogateError::OutOfRange { distance_meters: None, .. } => base
            .with_kind("out_of_range")
            .with_context("No target with a valid location is available.")
            .with_suggestion("Check that the facility's assets have coordinates")
            .with_help("Run: geogate evaluate --help")
            .denied(),
        GeogateError::OutOfRange { .. } => base
            .with_kind("out_of_range")
            .with_suggestion("Move closer to the target and try again")
            .denied(),
        GeogateError::ScanCodeMismatch { .. } => base
            .with_kind("scan_code_mismatch")
            .with_suggestion("Scan the code attached to the task's asset")
            .denied(),
        GeogateError::AlreadyInProgress { .. } => {
            base.with_kind("already_in_progress").denied()
        }
        GeogateError::InvalidTransition { .. } => base
            .with_kind("invalid_transition")
            .with_suggestion("Check today's attendance: geogate status --at LAT,LON")
            .denied(),
        GeogateError::TargetMismatch { .. } => base
            .with_kind("target_mismatch")
            .with_suggestion("Check out at the asset you checked in at")
            .with_suggestion("Or allow any nearby asset: --binding nearest")
            .denied(),
        GeogateError::Position(PositionError::PermissionDenied) => base
            .with_kind("position")
            .with_suggestion("Grant location access and try again"),
        GeogateError::Position(_) => base
            .with_kind("position")
            .with_suggestion("Provide the current position with --at LAT,LON"),
        GeogateError::InvalidCoordinate { .. } => base
            .with_kind("invalid_coordinate")
            .with_context("Latitude must be within [-90, 90] and longitude within [-180, 180]."),
        GeogateError::Config(_) | GeogateError::ConfigInvalid { .. } => base
            .with_kind("config")
            .with_suggestion("Check geogate.toml and GEOGATE_* environment variables")
            .with_help("Run: geogate config"),
        GeogateError::Backend { .. } => base
            .with_kind("backend")
            .with_suggestion("Check that the API is reachable: --api-url or GEOGATE_API_URL")
            .with_suggestion("Check the API token: GEOGATE_API_TOKEN"),
        GeogateError::Serialization(_) => base.with_kind("serialization"),
    }
}
