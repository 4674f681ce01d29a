//! Reading detection tables back from CSV.
//!
//! Accepts both tracking logs and enriched tables, so pipeline stages can be
//! run separately. The fixed detection columns are required; `lat`/`lon` are
//! optional and every other column becomes row metadata.

use crate::constants::columns;
use crate::error::{Error, Result};
use crate::row::{BoundingBox, DetectionRow, EnrichedRow, GeoPoint, Metadata, Scalar, TrackId};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Column positions resolved from the header.
struct Layout {
    fixed: [usize; 9],
    lat: Option<usize>,
    lon: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl Layout {
    fn from_headers(path: &Path, headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let mut fixed = [0usize; 9];
        for (slot, name) in fixed.iter_mut().zip(columns::DETECTION) {
            *slot = find(name).ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })?;
        }

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !columns::is_reserved(name))
            .map(|(idx, name)| (idx, name.to_string()))
            .collect();

        Ok(Self {
            fixed,
            lat: find(columns::LAT),
            lon: find(columns::LON),
            extra,
        })
    }
}

/// Cell parsing for one record.
struct Cells<'a> {
    path: &'a Path,
    record: &'a csv::StringRecord,
    line: u64,
}

impl Cells<'_> {
    fn raw(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or_default()
    }

    fn parse<T: FromStr>(&self, idx: usize, column: &str) -> Result<T> {
        let raw = self.raw(idx);
        raw.trim().parse().map_err(|_| self.invalid(column, raw))
    }

    fn optional_f64(&self, idx: Option<usize>, column: &str) -> Result<Option<f64>> {
        match idx.map(|i| self.raw(i).trim()) {
            None | Some("") => Ok(None),
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Some(value)),
                _ => Err(self.invalid(column, raw)),
            },
        }
    }

    fn invalid(&self, column: &str, value: &str) -> Error {
        Error::InvalidValue {
            path: PathBuf::from(self.path),
            column: column.to_string(),
            value: value.to_string(),
            line: self.line,
        }
    }
}

/// Read a detection table.
///
/// Rows get a position only when both `lat` and `lon` are present and
/// non-empty.
pub fn read_detection_table(path: &Path) -> Result<Vec<EnrichedRow>> {
    let csv_err = |e| Error::CsvRead {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let layout = Layout::from_headers(path, &headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let cells = Cells {
            path,
            record: &record,
            line: record.position().map_or(0, csv::Position::line),
        };
        let [frame, track, class, conf, xmin, ymin, xmax, ymax, source] = layout.fixed;

        let extra: Metadata = layout
            .extra
            .iter()
            .filter_map(|(idx, name)| {
                let raw = cells.raw(*idx);
                (!raw.is_empty()).then(|| (name.as_str(), Scalar::parse_cell(raw)))
            })
            .collect();

        let detection = DetectionRow {
            frame_index: cells.parse(frame, columns::FRAME)?,
            track_id: TrackId::from_sentinel(cells.parse(track, columns::TRACK_ID)?),
            class_id: cells.parse(class, columns::CLASS_ID)?,
            confidence: cells.parse(conf, columns::CONFIDENCE)?,
            bbox: BoundingBox::new(
                cells.parse(xmin, columns::XMIN)?,
                cells.parse(ymin, columns::YMIN)?,
                cells.parse(xmax, columns::XMAX)?,
                cells.parse(ymax, columns::YMAX)?,
            ),
            source: cells.raw(source).to_string(),
            extra,
        };

        let lat = cells.optional_f64(layout.lat, columns::LAT)?;
        let lon = cells.optional_f64(layout.lon, columns::LON)?;
        let position = lat.zip(lon).map(|(lat, lon)| GeoPoint::new(lat, lon));

        rows.push(EnrichedRow {
            detection,
            position,
        });
    }

    debug!("Read {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "frame,track_id,class_id,confidence,xmin,ymin,xmax,ymax,source";

    #[test]
    fn test_read_tracking_log() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER},timestamp").unwrap();
        writeln!(file, "0,-1,2,0.5,1,2,3,4,cam.mp4,007").unwrap();
        writeln!(file, "1,8,2,0.75,1,2,3,4,cam.mp4,").unwrap();
        file.flush().unwrap();

        let rows = read_detection_table(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].detection.track_id, TrackId::UNTRACKED);
        assert_eq!(
            rows[0].detection.extra.get("timestamp"),
            Some(&Scalar::Text("007".to_string()))
        );
        assert_eq!(rows[1].detection.track_id, TrackId::new(8));
        assert!(rows[1].detection.extra.is_empty());
        assert!(rows.iter().all(|r| r.position.is_none()));
    }

    #[test]
    fn test_read_enriched_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER},timestamp,lat,lon").unwrap();
        writeln!(file, "0,1,0,0.9,0,0,1,1,cam,t0,10.0,20.0").unwrap();
        writeln!(file, "1,1,0,0.9,0,0,1,1,cam,t1,,").unwrap();
        writeln!(file, "2,1,0,0.9,0,0,1,1,cam,t2,10.0,").unwrap();
        file.flush().unwrap();

        let rows = read_detection_table(file.path()).unwrap();
        assert_eq!(rows[0].position, Some(GeoPoint::new(10.0, 20.0)));
        assert!(rows[1].position.is_none());
        assert!(rows[2].position.is_none());
        assert!(!rows[0].detection.extra.contains_key("lat"));
    }

    #[test]
    fn test_missing_fixed_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "frame,track_id,class_id").unwrap();
        writeln!(file, "0,1,0").unwrap();
        file.flush().unwrap();

        let result = read_detection_table(file.path());
        assert!(matches!(result, Err(Error::MissingColumn { column, .. }) if column == "confidence"));
    }

    #[test]
    fn test_invalid_confidence() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "0,1,0,high,0,0,1,1,cam").unwrap();
        file.flush().unwrap();

        let result = read_detection_table(file.path());
        assert!(matches!(
            result,
            Err(Error::InvalidValue { line: 2, ref column, .. }) if column == "confidence"
        ));
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER},lat,lon").unwrap();
        writeln!(file, "0,1,0,0.9,0,0,1,1,cam,10.0,20.0").unwrap();
        writeln!(file, "1,1,0,0.9,0,0,1,1,cam,NaN,inf").unwrap();
        file.flush().unwrap();

        let result = read_detection_table(file.path());
        assert!(matches!(
            result,
            Err(Error::InvalidValue { line: 3, ref column, ref value, .. })
                if column == "lat" && value == "NaN"
        ));
    }
}
