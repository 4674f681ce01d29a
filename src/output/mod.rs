//! Output format writers.

mod csv;
mod geojson;
mod map;
pub mod progress;
mod table;
mod writer;

pub use self::csv::{CsvWriter, write_rows};
pub use geojson::{Feature, FeatureCollection, GeoJsonWriter, PointGeometry};
pub use map::MapWriter;
pub use table::read_detection_table;
pub use writer::{OutputWriter, ensure_parent_dir};
