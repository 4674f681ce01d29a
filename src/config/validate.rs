//! Configuration validation.

use crate::config::{Config, ReportConfig, ReportSettings};
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_report(&config.report)
}

/// Validate report settings that have a value in every configuration.
fn validate_report(report: &ReportConfig) -> Result<()> {
    let distance = report.dedupe_distance_m;
    if !distance.is_finite() || distance < 0.0 {
        return Err(Error::ConfigValidation {
            message: format!(
                "report.dedupe_distance_m must be a non-negative number, got {distance}"
            ),
        });
    }
    Ok(())
}

/// Resolve the settings required to build a report.
///
/// Fails when an output path the report needs is not configured.
pub fn resolve_report_settings(report: &ReportConfig) -> Result<ReportSettings> {
    validate_report(report)?;

    let map_html = if report.map.enabled {
        Some(require(&report.map.output_html, "report.map.output_html")?)
    } else {
        None
    };

    Ok(ReportSettings {
        dedupe_distance_m: report.dedupe_distance_m,
        output_csv: require(&report.output_csv, "report.output_csv")?,
        output_geojson: require(&report.output_geojson, "report.output_geojson")?,
        map_html,
    })
}

fn require(value: &Option<PathBuf>, key: &str) -> Result<PathBuf> {
    value.clone().ok_or_else(|| Error::ConfigValidation {
        message: format!("missing required setting '{key}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ReportConfig {
        Config::starter().report
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_negative_distance() {
        let mut config = Config::default();
        config.report.dedupe_distance_m = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nan_distance() {
        let mut config = Config::default();
        config.report.dedupe_distance_m = f64::NAN;
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_zero_distance_is_valid() {
        let mut report = complete();
        report.dedupe_distance_m = 0.0;
        assert!(resolve_report_settings(&report).is_ok());
    }

    #[test]
    fn test_resolve_requires_output_paths() {
        let mut report = complete();
        report.output_geojson = None;
        let err = resolve_report_settings(&report).unwrap_err();
        assert!(err.to_string().contains("report.output_geojson"));
    }

    #[test]
    fn test_resolve_map_only_when_enabled() {
        let mut report = complete();
        report.map.output_html = None;
        let settings = resolve_report_settings(&report);
        assert!(settings.is_ok_and(|s| s.map_html.is_none()));

        report.map.enabled = true;
        assert!(resolve_report_settings(&report).is_err());
    }
}
