//! Nivaro - incident reports from object-tracking output.
//!
//! Turns per-frame detector/tracker results into per-detection rows, joins
//! them with GPS fixes by timestamp, collapses spatial duplicates and writes
//! CSV, GeoJSON and optional HTML map artifacts.

#![warn(missing_docs)]
#![allow(clippy::print_stdout)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod gps;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod row;
pub mod tracking;

use clap::Parser;
use cli::{Cli, Command, ConfigAction, GlobalArgs, ReportOverrides};
use config::{
    Config, ReportSettings, config_file_path, load_config, resolve_report_settings, save_config,
    validate_config,
};
use constants::{DEFAULT_ENRICHED_OUTPUT, DEFAULT_TRACKING_OUTPUT};
use report::ReportArtifacts;
use std::path::PathBuf;
use tracing::info;

pub use error::{Error, Result};

/// Main entry point for the nivaro CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let global = &cli.global;
    match cli.command {
        Command::Config { action } => handle_config_command(action, global),
        Command::Track(args) => {
            let config = load_validated_config(global)?;
            let output = args
                .output
                .or(config.tracking.output_csv)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACKING_OUTPUT));
            let rows = pipeline::extract_rows(
                &args.frames,
                args.metadata.as_deref(),
                show_progress(global),
            )?;
            output::write_rows(&output, &rows)?;
            info!("Wrote {} row(s) to {}", rows.len(), output.display());
            Ok(())
        }
        Command::Sync(args) => {
            load_validated_config(global)?;
            let output = args
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ENRICHED_OUTPUT));
            pipeline::sync_table(&args.detections, &args.gps, &output)?;
            Ok(())
        }
        Command::Report(args) => {
            let config = load_validated_config(global)?;
            let settings = report_settings(&config, &args.overrides)?;
            let artifacts = pipeline::report_table(&args.input, settings)?;
            print_artifacts(&artifacts);
            Ok(())
        }
        Command::Run(args) => {
            let config = load_validated_config(global)?;
            let settings = report_settings(&config, &args.overrides)?;
            let artifacts = pipeline::run_pipeline(
                &args.frames,
                args.metadata.as_deref(),
                &args.gps,
                config.tracking.output_csv.as_deref(),
                settings,
                show_progress(global),
            )?;
            print_artifacts(&artifacts);
            Ok(())
        }
    }
}

/// Load the configuration and validate it before any pipeline work.
fn load_validated_config(global: &GlobalArgs) -> Result<Config> {
    let config = load_config(global.config.as_deref())?;
    validate_config(&config)?;
    Ok(config)
}

const fn show_progress(global: &GlobalArgs) -> bool {
    !global.no_progress && !global.quiet
}

/// Apply CLI overrides to the report config and resolve required paths.
fn report_settings(config: &Config, overrides: &ReportOverrides) -> Result<ReportSettings> {
    let mut report = config.report.clone();
    if let Some(distance) = overrides.distance {
        report.dedupe_distance_m = distance;
    }
    if overrides.map {
        report.map.enabled = true;
    }
    resolve_report_settings(&report)
}

fn print_artifacts(artifacts: &ReportArtifacts) {
    println!(
        "{} of {} row(s) kept, {} feature(s)",
        artifacts.rows_kept, artifacts.rows_in, artifacts.features
    );
    println!("  csv:     {}", artifacts.csv.display());
    println!("  geojson: {}", artifacts.geojson.display());
    if let Some(path) = &artifacts.map_html {
        println!("  map:     {}", path.display());
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_config_command(action: ConfigAction, global: &GlobalArgs) -> Result<()> {
    let path = match &global.config {
        Some(path) => path.clone(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::starter(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nEdit the [report] output paths, then run:");
                println!("  nivaro run <frames.ndjson> --gps <gps.csv>");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(global.config.as_deref())?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
