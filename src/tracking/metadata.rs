//! Per-frame metadata loaded from CSV.

use crate::constants::columns;
use crate::error::{Error, Result};
use crate::row::{Metadata, Scalar};
use std::collections::HashMap;
use std::path::Path;

/// Per-frame metadata keyed by frame index.
///
/// The file needs a `frame` column; every other column becomes a metadata
/// key. Empty cells are left out of the frame's mapping.
#[derive(Debug, Clone, Default)]
pub struct FrameMetadataTable {
    frames: HashMap<u64, Metadata>,
}

impl FrameMetadataTable {
    /// Load the table from a CSV file.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| Error::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let headers = reader
            .headers()
            .map_err(|e| Error::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?
            .clone();

        let frame_col = headers
            .iter()
            .position(|h| h == columns::FRAME)
            .ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column: columns::FRAME.to_string(),
            })?;

        let mut frames = HashMap::new();
        for result in reader.records() {
            let record = result.map_err(|e| Error::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            let line = record.position().map_or(0, csv::Position::line);

            let raw_frame = record.get(frame_col).unwrap_or_default();
            let frame: u64 = raw_frame.parse().map_err(|_| Error::InvalidValue {
                path: path.to_path_buf(),
                column: columns::FRAME.to_string(),
                value: raw_frame.to_string(),
                line,
            })?;

            let metadata: Metadata = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(idx, (_, cell))| *idx != frame_col && !cell.is_empty())
                .map(|(_, (name, cell))| (name, Scalar::parse_cell(cell)))
                .collect();

            frames.insert(frame, metadata);
        }

        Ok(Self { frames })
    }

    /// Metadata for a frame (empty if the frame has no entry).
    pub fn lookup(&self, frame_index: u64) -> Metadata {
        self.frames.get(&frame_index).cloned().unwrap_or_default()
    }

    /// Number of frames with metadata.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
