//! GeoJSON output format writer.

use crate::error::{Error, Result};
use crate::output::{OutputWriter, ensure_parent_dir};
use crate::row::RowFields;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// GeoJSON `FeatureCollection`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Point features.
    pub features: Vec<Feature>,
}

/// A single GeoJSON feature.
#[derive(Debug, Serialize, Deserialize)]
pub struct Feature {
    /// Always `"Feature"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Point geometry.
    pub geometry: PointGeometry,
    /// All row fields.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// GeoJSON point geometry.
#[derive(Debug, Serialize, Deserialize)]
pub struct PointGeometry {
    /// Always `"Point"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lon, lat]`.
    pub coordinates: [f64; 2],
}

/// Writer for GeoJSON point collections.
///
/// Rows without a position are skipped. The file is written on finalize.
pub struct GeoJsonWriter {
    output_path: PathBuf,
    features: Vec<Feature>,
}

impl GeoJsonWriter {
    /// Create a new GeoJSON writer.
    pub fn new(output_path: &Path) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            features: Vec::new(),
        }
    }

    /// Number of features collected so far.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl OutputWriter for GeoJsonWriter {
    fn write_header(&mut self) -> Result<()> {
        // No header for GeoJSON - written at finalize
        Ok(())
    }

    fn write_row(&mut self, row: &dyn RowFields) -> Result<()> {
        let Some(point) = row.position() else {
            return Ok(());
        };

        let properties = row
            .fields()
            .into_iter()
            .map(|(name, value)| {
                let value = value.map_or(serde_json::Value::Null, |v| v.to_json());
                (name, value)
            })
            .collect();

        self.features.push(Feature {
            kind: "Feature".to_string(),
            geometry: PointGeometry {
                kind: "Point".to_string(),
                coordinates: [point.lon, point.lat],
            },
            properties,
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let collection = FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features: std::mem::take(&mut self.features),
        };

        ensure_parent_dir(&self.output_path)?;
        let io_err = |e| Error::OutputWrite {
            path: self.output_path.clone(),
            source: e,
        };
        let file = File::create(&self.output_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &collection).map_err(|e| Error::JsonWrite {
            path: self.output_path.clone(),
            source: e,
        })?;
        writer.flush().map_err(io_err)?;

        self.features = collection.features;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::row::{BoundingBox, DetectionRow, EnrichedRow, GeoPoint, Metadata, TrackId};
    use tempfile::tempdir;

    fn row(position: Option<GeoPoint>) -> EnrichedRow {
        EnrichedRow {
            detection: DetectionRow {
                frame_index: 4,
                track_id: TrackId::UNTRACKED,
                class_id: 1,
                confidence: 0.6,
                bbox: BoundingBox::new(0.0, 0.0, 2.0, 2.0),
                source: "cam".to_string(),
                extra: Metadata::new(),
            },
            position,
        }
    }

    #[test]
    fn test_geojson_writer_excludes_unlocated_rows() {
        let dir = tempdir().expect("create temp dir");
        let output_path = dir.path().join("out/report.geojson");

        let mut writer = GeoJsonWriter::new(&output_path);
        writer.write_header().unwrap();
        writer
            .write_row(&row(Some(GeoPoint::new(10.0, 20.0))))
            .unwrap();
        writer.write_row(&row(None)).unwrap();
        writer.finalize().unwrap();
        assert_eq!(writer.feature_count(), 1);

        let content = std::fs::read_to_string(&output_path).expect("read file");
        let result: FeatureCollection = serde_json::from_str(&content).expect("parse JSON");

        assert_eq!(result.kind, "FeatureCollection");
        assert_eq!(result.features.len(), 1);
        let feature = &result.features[0];
        assert_eq!(feature.geometry.kind, "Point");
        assert_eq!(feature.geometry.coordinates, [20.0, 10.0]);
        assert_eq!(feature.properties["track_id"], serde_json::json!(-1));
        assert_eq!(feature.properties["lat"], serde_json::json!(10.0));
        assert_eq!(feature.properties["source"], serde_json::json!("cam"));
    }

    #[test]
    fn test_geojson_writer_empty_collection() {
        let dir = tempdir().expect("create temp dir");
        let output_path = dir.path().join("empty.geojson");

        let mut writer = GeoJsonWriter::new(&output_path);
        writer.write_row(&row(None)).unwrap();
        writer.finalize().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "FeatureCollection", "features": []})
        );
    }

    #[test]
    fn test_unwritable_path_reports_output_path() {
        let dir = tempdir().expect("create temp dir");

        let mut writer = GeoJsonWriter::new(dir.path());
        writer.write_row(&row(Some(GeoPoint::new(1.0, 2.0)))).unwrap();
        let result = writer.finalize();

        assert!(matches!(
            result,
            Err(Error::OutputWrite { ref path, .. }) if path == dir.path()
        ));
    }
}
