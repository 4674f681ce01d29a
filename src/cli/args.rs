//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Turn object-tracking output into geolocated, deduplicated incident reports.
#[derive(Debug, Parser)]
#[command(name = "nivaro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "NIVARO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract per-detection rows from a frame result stream.
    Track(TrackArgs),
    /// Join a detection table with GPS fixes.
    Sync(SyncArgs),
    /// Build report artifacts from an enriched detection table.
    Report(ReportArgs),
    /// Extract, join and report in one pass.
    Run(RunArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create a starter configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for `track`.
#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Frame results, one JSON object per line.
    pub frames: PathBuf,

    /// Per-frame metadata table keyed by a `frame` column.
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Tracking log path (overrides config).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `sync`.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Detection table with a `timestamp` column.
    #[arg(long)]
    pub detections: PathBuf,

    /// GPS table with `timestamp`, `lat` and `lon` columns.
    #[arg(long)]
    pub gps: PathBuf,

    /// Enriched table path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Report overrides shared by `report` and `run`.
#[derive(Debug, Args)]
pub struct ReportOverrides {
    /// Deduplication distance in meters (overrides config).
    #[arg(long, value_parser = parse_distance, env = "NIVARO_DEDUPE_DISTANCE")]
    pub distance: Option<f64>,

    /// Also write the HTML map.
    #[arg(long)]
    pub map: bool,
}

/// Arguments for `report`.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Enriched detection table.
    pub input: PathBuf,

    /// Report overrides.
    #[command(flatten)]
    pub overrides: ReportOverrides,
}

/// Arguments for `run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Frame results, one JSON object per line.
    pub frames: PathBuf,

    /// GPS table with `timestamp`, `lat` and `lon` columns.
    #[arg(long)]
    pub gps: PathBuf,

    /// Per-frame metadata table keyed by a `frame` column.
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Report overrides.
    #[command(flatten)]
    pub overrides: ReportOverrides,
}

/// Parse and validate a deduplication distance.
fn parse_distance(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "distance must be a non-negative number of meters, got {value}"
        ));
    }

    Ok(value)
}
