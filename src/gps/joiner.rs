//! Joining detection rows with GPS positions.

use crate::constants::columns;
use crate::gps::GpsIndex;
use crate::row::{DetectionRow, EnrichedRow};
use tracing::{Span, info};

/// Attaches GPS positions to detection rows by exact timestamp match.
pub struct MetadataJoiner<'a> {
    index: &'a GpsIndex,
    span: Span,
}

impl<'a> MetadataJoiner<'a> {
    /// Create a joiner over a pre-built index.
    pub fn new(index: &'a GpsIndex, span: Span) -> Self {
        Self { index, span }
    }

    /// Enrich one row.
    ///
    /// Rows without a `timestamp` entry, or whose timestamp has no GPS fix,
    /// come back without coordinates.
    pub fn join(&self, row: DetectionRow) -> EnrichedRow {
        let position = row
            .extra
            .get(columns::TIMESTAMP)
            .and_then(|ts| self.index.get(&ts.to_string()))
            .map(super::GpsRecord::point);

        EnrichedRow {
            detection: row,
            position,
        }
    }

    /// Enrich every row, preserving order.
    pub fn join_all(&self, rows: impl IntoIterator<Item = DetectionRow>) -> Vec<EnrichedRow> {
        let enriched: Vec<EnrichedRow> = rows.into_iter().map(|row| self.join(row)).collect();
        let matched = enriched.iter().filter(|r| r.position.is_some()).count();

        self.span.in_scope(|| {
            info!(
                "Joined {} row(s) with GPS: {matched} matched, {} without coordinates",
                enriched.len(),
                enriched.len() - matched
            );
        });
        enriched
    }
}
