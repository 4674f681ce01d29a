//! Report generation: spatial deduplication and artifact emission.

mod builder;
mod dedupe;
mod emitter;

pub use builder::ReportBuilder;
pub use dedupe::{DeduplicationCluster, SpatialDeduplicator, approx_distance_m};
pub use emitter::{ReportArtifacts, ReportEmitter};
