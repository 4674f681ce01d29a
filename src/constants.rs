//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "nivaro";

/// Default deduplication distance in meters.
pub const DEFAULT_DEDUPE_DISTANCE_M: f64 = 5.0;

/// Meters per degree used by the planar distance approximation.
///
/// Accurate near the equator at small scales only; no latitude correction
/// is applied.
pub const METERS_PER_DEGREE: f64 = 111_139.0;

/// Track id written for detections without a tracker identity.
pub const UNTRACKED_SENTINEL: i64 = -1;

/// Default tracking log path for `track` when none is configured.
pub const DEFAULT_TRACKING_OUTPUT: &str = "data/exports/tracking.csv";

/// Default output path for `sync` when none is given.
pub const DEFAULT_ENRICHED_OUTPUT: &str = "data/exports/detections_enriched.csv";

/// Column names of the fixed detection fields, in output order.
pub mod columns {
    /// Frame index.
    pub const FRAME: &str = "frame";
    /// Tracker identity.
    pub const TRACK_ID: &str = "track_id";
    /// Class id.
    pub const CLASS_ID: &str = "class_id";
    /// Confidence score.
    pub const CONFIDENCE: &str = "confidence";
    /// Bounding box left.
    pub const XMIN: &str = "xmin";
    /// Bounding box top.
    pub const YMIN: &str = "ymin";
    /// Bounding box right.
    pub const XMAX: &str = "xmax";
    /// Bounding box bottom.
    pub const YMAX: &str = "ymax";
    /// Source media identifier.
    pub const SOURCE: &str = "source";
    /// Latitude (enriched rows only).
    pub const LAT: &str = "lat";
    /// Longitude (enriched rows only).
    pub const LON: &str = "lon";
    /// Metadata key used to join against GPS records.
    pub const TIMESTAMP: &str = "timestamp";

    /// Fixed detection columns.
    pub const DETECTION: [&str; 9] = [
        FRAME, TRACK_ID, CLASS_ID, CONFIDENCE, XMIN, YMIN, XMAX, YMAX, SOURCE,
    ];

    /// Names that per-frame metadata may never override.
    pub const RESERVED: [&str; 11] = [
        FRAME, TRACK_ID, CLASS_ID, CONFIDENCE, XMIN, YMIN, XMAX, YMAX, SOURCE, LAT, LON,
    ];

    /// Whether `name` is one of the fixed fields.
    pub fn is_reserved(name: &str) -> bool {
        RESERVED.contains(&name)
    }
}

/// Map visualization constants.
pub mod map {
    /// Initial zoom level.
    pub const ZOOM_START: u8 = 14;
    /// Circle marker radius in pixels.
    pub const MARKER_RADIUS: u8 = 6;
    /// Document written when there is nothing to plot.
    pub const PLACEHOLDER_HTML: &str = "<p>No rows to map.</p>";
    /// Leaflet version loaded by the map document.
    pub const LEAFLET_VERSION: &str = "1.9.4";
}
