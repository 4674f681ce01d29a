//! Report construction: deduplicate, then emit.

use crate::config::ReportSettings;
use crate::error::{Error, Result};
use crate::report::{ReportArtifacts, ReportEmitter, SpatialDeduplicator};
use crate::row::EnrichedRow;
use tracing::{Span, info, info_span};

/// Builds the incident report from enriched rows.
pub struct ReportBuilder {
    deduplicator: SpatialDeduplicator,
    emitter: ReportEmitter,
    span: Span,
}

impl ReportBuilder {
    /// Create a builder. Child components log under `span`.
    pub fn new(settings: ReportSettings, span: Span) -> Self {
        let deduplicator = SpatialDeduplicator::new(
            settings.dedupe_distance_m,
            span.in_scope(|| info_span!("dedupe")),
        );
        let emitter = ReportEmitter::new(settings, span.in_scope(|| info_span!("emit")));
        Self {
            deduplicator,
            emitter,
            span,
        }
    }

    /// Deduplicate `rows` and write every configured artifact.
    ///
    /// Returns [`Error::EmptyInput`] without touching the filesystem when
    /// `rows` is empty.
    pub fn build(&self, rows: Vec<EnrichedRow>) -> Result<ReportArtifacts> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }

        let rows_in = rows.len();
        let kept = self.deduplicator.dedupe(rows);
        let mut artifacts = self.emitter.emit(&kept)?;
        artifacts.rows_in = rows_in;

        self.span.in_scope(|| {
            info!(
                "Report built: {rows_in} row(s) in, {} kept, {} feature(s)",
                artifacts.rows_kept, artifacts.features
            );
        });
        Ok(artifacts)
    }
}
