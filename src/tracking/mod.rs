//! Frame result ingestion and row extraction.

mod extractor;
mod frame;
mod metadata;

pub use extractor::{MetadataFn, TrackExtractor, strip_reserved};
pub use frame::{FrameResult, NdjsonFrameSource, RawDetection};
pub use metadata::FrameMetadataTable;
