//! GPS record loading and lookup.

use crate::constants::columns;
use crate::error::{Error, Result};
use crate::row::GeoPoint;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A timestamped GPS fix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GpsRecord {
    /// Timestamp key, compared by exact string equality.
    pub timestamp: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl GpsRecord {
    /// Position of this fix.
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// GPS records indexed by timestamp.
#[derive(Debug, Clone, Default)]
pub struct GpsIndex {
    records: HashMap<String, GpsRecord>,
}

impl GpsIndex {
    /// Build an index. Later records replace earlier ones with the same timestamp.
    pub fn from_records(records: impl IntoIterator<Item = GpsRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.timestamp.clone(), r))
            .collect();
        Self { records }
    }

    /// Load GPS records from a CSV file with `timestamp`, `lat` and `lon` columns.
    ///
    /// Additional columns are ignored. Non-finite coordinates are rejected.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let csv_err = |e| Error::CsvRead {
            path: path.to_path_buf(),
            source: e,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        for column in [columns::TIMESTAMP, columns::LAT, columns::LON] {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                });
            }
        }

        let mut total = 0usize;
        let mut records = HashMap::new();
        for result in reader.records() {
            let raw = result.map_err(csv_err)?;
            let line = raw.position().map_or(0, csv::Position::line);
            let record: GpsRecord = raw.deserialize(Some(&headers)).map_err(csv_err)?;

            for (column, value) in [(columns::LAT, record.lat), (columns::LON, record.lon)] {
                if !value.is_finite() {
                    return Err(Error::InvalidValue {
                        path: path.to_path_buf(),
                        column: column.to_string(),
                        value: value.to_string(),
                        line,
                    });
                }
            }
            total += 1;
            records.insert(record.timestamp.clone(), record);
        }

        debug!(
            "Loaded {total} GPS record(s), {} unique timestamp(s) from {}",
            records.len(),
            path.display()
        );
        Ok(Self { records })
    }

    /// Look up a record by exact timestamp.
    pub fn get(&self, timestamp: &str) -> Option<&GpsRecord> {
        self.records.get(timestamp)
    }

    /// Number of indexed timestamps.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
