//! Report artifact emission.

use crate::config::ReportSettings;
use crate::error::Result;
use crate::output::{CsvWriter, GeoJsonWriter, MapWriter, OutputWriter};
use crate::row::{EnrichedRow, RowFields};
use std::path::{Path, PathBuf};
use tracing::{Span, debug, info};

/// Paths and counts of the artifacts written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    /// Tabular artifact.
    pub csv: PathBuf,
    /// GeoJSON artifact.
    pub geojson: PathBuf,
    /// Map document, when enabled.
    pub map_html: Option<PathBuf>,
    /// Rows received by the builder.
    pub rows_in: usize,
    /// Rows retained after deduplication.
    pub rows_kept: usize,
    /// GeoJSON features written.
    pub features: usize,
}

/// Writes retained rows to the configured artifacts.
pub struct ReportEmitter {
    settings: ReportSettings,
    span: Span,
}

impl ReportEmitter {
    /// Create an emitter for the given settings.
    pub fn new(settings: ReportSettings, span: Span) -> Self {
        Self { settings, span }
    }

    /// Write every artifact for `rows`, returning their locations.
    ///
    /// `rows_in` is filled with `rows.len()`; callers that deduplicated
    /// first overwrite it with the pre-dedupe count.
    pub fn emit(&self, rows: &[EnrichedRow]) -> Result<ReportArtifacts> {
        let _guard = self.span.enter();

        let columns = CsvWriter::columns_for(rows);

        let settings = &self.settings;
        let mut writers: Vec<(&str, &Path, Box<dyn OutputWriter>)> = Vec::new();
        writers.push((
            "csv",
            settings.output_csv.as_path(),
            Box::new(CsvWriter::new(&settings.output_csv, columns)?),
        ));
        writers.push((
            "geojson",
            settings.output_geojson.as_path(),
            Box::new(GeoJsonWriter::new(&settings.output_geojson)),
        ));
        if let Some(path) = &settings.map_html {
            writers.push(("map", path.as_path(), Box::new(MapWriter::new(path))));
        }

        for (kind, path, writer) in &mut writers {
            debug!("Writing {kind} output: {}", path.display());
            writer.write_header()?;
            for row in rows {
                writer.write_row(row)?;
            }
            writer.finalize()?;
        }

        let features = rows.iter().filter(|row| row.position().is_some()).count();
        info!(
            "Wrote {} row(s) to {} and {features} feature(s) to {}",
            rows.len(),
            self.settings.output_csv.display(),
            self.settings.output_geojson.display()
        );
        if let Some(path) = &self.settings.map_html {
            info!("Wrote map to {}", path.display());
        }

        Ok(ReportArtifacts {
            csv: self.settings.output_csv.clone(),
            geojson: self.settings.output_geojson.clone(),
            map_html: self.settings.map_html.clone(),
            rows_in: rows.len(),
            rows_kept: rows.len(),
            features,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::FeatureCollection;
    use crate::row::{BoundingBox, DetectionRow, GeoPoint, Metadata, Scalar, TrackId};
    use tempfile::tempdir;

    fn row(track: u32, position: Option<GeoPoint>) -> EnrichedRow {
        let mut extra = Metadata::new();
        extra.insert("timestamp", Scalar::Int(100 + i64::from(track)));
        EnrichedRow {
            detection: DetectionRow {
                frame_index: 0,
                track_id: TrackId::new(track),
                class_id: 1,
                confidence: 0.9,
                bbox: BoundingBox::new(0.0, 0.0, 5.0, 5.0),
                source: "cam0".to_string(),
                extra,
            },
            position,
        }
    }

    fn settings(dir: &Path, map: bool) -> ReportSettings {
        ReportSettings {
            dedupe_distance_m: 5.0,
            output_csv: dir.join("out/report.csv"),
            output_geojson: dir.join("out/report.geojson"),
            map_html: map.then(|| dir.join("out/map.html")),
        }
    }

    #[test]
    fn test_emit_writes_csv_and_geojson() {
        let dir = tempdir().unwrap();
        let emitter = ReportEmitter::new(settings(dir.path(), false), Span::none());
        let rows = vec![row(1, Some(GeoPoint::new(1.0, 2.0))), row(2, None)];

        let artifacts = emitter.emit(&rows).unwrap();
        assert_eq!(artifacts.features, 1);
        assert!(artifacts.map_html.is_none());

        let csv = std::fs::read_to_string(&artifacts.csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("timestamp,lat,lon"));
        assert!(lines[2].ends_with("102,,"));

        let text = std::fs::read_to_string(&artifacts.geojson).unwrap();
        let collection: FeatureCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].geometry.coordinates, [2.0, 1.0]);
    }

    #[test]
    fn test_emit_writes_map_when_enabled() {
        let dir = tempdir().unwrap();
        let emitter = ReportEmitter::new(settings(dir.path(), true), Span::none());

        let artifacts = emitter.emit(&[row(1, None)]).unwrap();
        let html = std::fs::read_to_string(artifacts.map_html.unwrap()).unwrap();
        assert_eq!(html, "<p>No rows to map.</p>");
    }
}
