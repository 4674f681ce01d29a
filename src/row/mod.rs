//! Detection row data model.

mod scalar;
mod types;

pub use scalar::{Metadata, Scalar};
pub use types::{BoundingBox, DetectionRow, EnrichedRow, Field, GeoPoint, RowFields, TrackId};
