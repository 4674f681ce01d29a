//! Greedy spatial deduplication.
//!
//! Rows are visited in input order and compared against the representatives
//! kept so far. A row within the threshold of any representative is absorbed
//! by the first such representative; otherwise it becomes a representative
//! itself. Rows without coordinates are always kept and never compared.
//!
//! The result depends on arrival order and is not a transitive closure:
//! with A-B and B-C within the threshold but A-C beyond it, the sequence
//! A, B, C keeps {A, C} while B, A, C keeps only {B}.

use crate::constants::METERS_PER_DEGREE;
use crate::row::{EnrichedRow, GeoPoint};
use tracing::{Span, debug, info};

/// Approximate ground distance in meters between two points.
///
/// Planar Euclidean distance in degrees scaled by a fixed meters-per-degree
/// factor. No latitude correction is applied.
pub fn approx_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    (a.lon - b.lon).hypot(a.lat - b.lat) * METERS_PER_DEGREE
}

/// A representative row and the rows it absorbed.
#[derive(Debug, Clone)]
pub struct DeduplicationCluster {
    /// The retained row.
    pub representative: EnrichedRow,
    /// Input position of the representative.
    pub position: usize,
    /// Input positions of discarded duplicates, in arrival order.
    pub absorbed: Vec<usize>,
}

impl DeduplicationCluster {
    fn new(representative: EnrichedRow, position: usize) -> Self {
        Self {
            representative,
            position,
            absorbed: Vec::new(),
        }
    }

    /// Number of input rows in this cluster, including the representative.
    pub fn size(&self) -> usize {
        1 + self.absorbed.len()
    }
}

/// Keeps one row per spatial cluster within a distance threshold.
pub struct SpatialDeduplicator {
    threshold_m: f64,
    span: Span,
}

impl SpatialDeduplicator {
    /// Create a deduplicator with a threshold in meters.
    pub fn new(threshold_m: f64, span: Span) -> Self {
        Self { threshold_m, span }
    }

    /// Configured threshold in meters.
    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    /// Group rows into clusters, ordered by their representative's position.
    pub fn clusters(&self, rows: Vec<EnrichedRow>) -> Vec<DeduplicationCluster> {
        let mut kept: Vec<DeduplicationCluster> = Vec::new();

        for (idx, row) in rows.into_iter().enumerate() {
            let Some(point) = row.position else {
                kept.push(DeduplicationCluster::new(row, idx));
                continue;
            };

            let owner = kept.iter_mut().find(|cluster| {
                cluster
                    .representative
                    .position
                    .is_some_and(|other| approx_distance_m(other, point) <= self.threshold_m)
            });

            match owner {
                Some(cluster) => {
                    self.span.in_scope(|| {
                        debug!(
                            "Row {idx} (frame {}) is a duplicate of row {}",
                            row.detection.frame_index, cluster.position
                        );
                    });
                    cluster.absorbed.push(idx);
                }
                None => kept.push(DeduplicationCluster::new(row, idx)),
            }
        }

        kept
    }

    /// Return the representative rows in input order.
    pub fn dedupe(&self, rows: Vec<EnrichedRow>) -> Vec<EnrichedRow> {
        let total = rows.len();
        let kept: Vec<EnrichedRow> = self
            .clusters(rows)
            .into_iter()
            .map(|cluster| cluster.representative)
            .collect();

        self.span.in_scope(|| {
            info!(
                "Deduplicated {total} row(s) to {} within {} m",
                kept.len(),
                self.threshold_m
            );
        });
        kept
    }
}
