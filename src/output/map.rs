//! HTML map output.
//!
//! Produces a single Leaflet page with one circle marker per geolocated row.

use crate::constants::{columns, map};
use crate::error::{Error, Result};
use crate::output::{OutputWriter, ensure_parent_dir};
use crate::row::{GeoPoint, RowFields, Scalar};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct Marker {
    lat: f64,
    lon: f64,
    popup: String,
}

/// Writer for the HTML map document. The file is written on finalize.
pub struct MapWriter {
    output_path: PathBuf,
    markers: Vec<Marker>,
}

impl MapWriter {
    /// Create a new map writer.
    pub fn new(output_path: &Path) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            markers: Vec::new(),
        }
    }

    /// Number of markers collected so far.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn render(&self) -> Result<String> {
        let Some(first) = self.markers.first() else {
            return Ok(map::PLACEHOLDER_HTML.to_string());
        };

        let markers = serde_json::to_string(&self.markers).map_err(|e| Error::JsonWrite {
            path: self.output_path.clone(),
            source: e,
        })?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Detections</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const markers = {markers};
const map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
for (const m of markers) {{
  L.circleMarker([m.lat, m.lon], {{ radius: {radius}, fill: true }})
    .bindPopup(m.popup)
    .addTo(map);
}}
</script>
</body>
</html>
"#,
            version = map::LEAFLET_VERSION,
            lat = first.lat,
            lon = first.lon,
            zoom = map::ZOOM_START,
            radius = map::MARKER_RADIUS,
        ))
    }
}

/// Popup text: `"<class_id> | conf=<confidence>"`.
fn popup_text(row: &dyn RowFields) -> String {
    let fields = row.fields();
    let field = |name: &str| {
        fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.clone())
    };

    let class = field(columns::CLASS_ID).map_or_else(|| "unknown".to_string(), |v| v.to_string());
    let confidence = field(columns::CONFIDENCE)
        .as_ref()
        .and_then(Scalar::as_f64)
        .unwrap_or(0.0);
    format!("{class} | conf={confidence:.2}")
}

impl OutputWriter for MapWriter {
    fn write_header(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_row(&mut self, row: &dyn RowFields) -> Result<()> {
        if let Some(GeoPoint { lat, lon }) = row.position() {
            self.markers.push(Marker {
                lat,
                lon,
                popup: popup_text(row),
            });
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let html = self.render()?;
        ensure_parent_dir(&self.output_path)?;
        std::fs::write(&self.output_path, html).map_err(|e| Error::OutputWrite {
            path: self.output_path.clone(),
            source: e,
        })?;
        Ok(())
    }
}
