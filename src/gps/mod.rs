//! GPS metadata loading and joining.

mod index;
mod joiner;

pub use index::{GpsIndex, GpsRecord};
pub use joiner::MetadataJoiner;
