//! Configuration type definitions.

use crate::constants::DEFAULT_DEDUPE_DISTANCE_M;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Tracking stage settings.
    #[serde(default)]
    pub tracking: TrackingConfig,
}

impl Config {
    /// Configuration written by `config init`, with example output paths.
    pub fn starter() -> Self {
        Self {
            report: ReportConfig {
                output_csv: Some(PathBuf::from("reports/incidents.csv")),
                output_geojson: Some(PathBuf::from("reports/incidents.geojson")),
                map: MapConfig {
                    enabled: false,
                    output_html: Some(PathBuf::from("reports/incidents_map.html")),
                },
                ..ReportConfig::default()
            },
            tracking: TrackingConfig {
                output_csv: Some(PathBuf::from("data/exports/tracking.csv")),
            },
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Maximum distance in meters at which two rows are duplicates.
    pub dedupe_distance_m: f64,

    /// Tabular artifact path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_csv: Option<PathBuf>,

    /// GeoJSON artifact path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_geojson: Option<PathBuf>,

    /// Map visualization settings.
    #[serde(default)]
    pub map: MapConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dedupe_distance_m: DEFAULT_DEDUPE_DISTANCE_M,
            output_csv: None,
            output_geojson: None,
            map: MapConfig::default(),
        }
    }
}

/// Map visualization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Whether to write the map document.
    pub enabled: bool,

    /// Map document path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_html: Option<PathBuf>,
}

/// Tracking stage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Tracking log written at the end of extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_csv: Option<PathBuf>,
}

/// Validated report settings handed to the report builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// Deduplication distance in meters.
    pub dedupe_distance_m: f64,
    /// Tabular artifact path.
    pub output_csv: PathBuf,
    /// GeoJSON artifact path.
    pub output_geojson: PathBuf,
    /// Map document path, when the map is enabled.
    pub map_html: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_default_values() {
        let report = ReportConfig::default();
        assert_eq!(report.dedupe_distance_m, 5.0);
        assert!(report.output_csv.is_none());
        assert!(!report.map.enabled);
    }

    #[test]
    fn test_starter_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::starter()).unwrap_or_default();
        assert!(text.contains("dedupe_distance_m = 5.0"));
        assert!(text.contains("[report.map]"));

        let parsed: Config = toml::from_str(&text).unwrap_or_default();
        assert_eq!(
            parsed.report.output_geojson,
            Some(PathBuf::from("reports/incidents.geojson"))
        );
    }
}
