//! Detection row type definitions.

use crate::constants::{UNTRACKED_SENTINEL, columns};
use crate::row::{Metadata, Scalar};

/// A named output field. `None` marks an empty cell / JSON null.
pub type Field = (String, Option<Scalar>);

/// Identity asserted by the upstream tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TrackId(Option<u32>);

impl TrackId {
    /// A detection without a stable identity.
    pub const UNTRACKED: Self = Self(None);

    /// A tracked identity.
    pub const fn new(id: u32) -> Self {
        Self(Some(id))
    }

    /// The identity, if the tracker assigned one.
    pub const fn get(self) -> Option<u32> {
        self.0
    }

    /// Whether the tracker assigned an identity.
    pub const fn is_tracked(self) -> bool {
        self.0.is_some()
    }

    /// Value written to tabular and JSON outputs (`-1` when untracked).
    pub fn to_sentinel(self) -> i64 {
        self.0.map_or(UNTRACKED_SENTINEL, i64::from)
    }

    /// Read a serialized identity; negative values mean untracked.
    pub fn from_sentinel(value: i64) -> Self {
        u32::try_from(value).map_or(Self::UNTRACKED, Self::new)
    }
}

impl From<Option<u32>> for TrackId {
    fn from(value: Option<u32>) -> Self {
        Self(value)
    }
}

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub xmin: f64,
    /// Top edge.
    pub ymin: f64,
    /// Right edge.
    pub xmax: f64,
    /// Bottom edge.
    pub ymax: f64,
}

impl BoundingBox {
    /// Create a box from its corners.
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// `xmin <= xmax` and `ymin <= ymax`.
    pub fn is_well_formed(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One normalized detection from one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRow {
    /// Index of the frame the detection came from.
    pub frame_index: u64,
    /// Tracker identity.
    pub track_id: TrackId,
    /// Class category.
    pub class_id: u32,
    /// Detection confidence (0.0 - 1.0).
    pub confidence: f64,
    /// Bounding box.
    pub bbox: BoundingBox,
    /// Originating media identifier.
    pub source: String,
    /// Per-frame metadata. Never contains a fixed field name.
    pub extra: Metadata,
}

/// A detection row joined with an optional GPS position.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    /// The underlying detection.
    pub detection: DetectionRow,
    /// Position from the GPS join, if one matched.
    pub position: Option<GeoPoint>,
}

impl EnrichedRow {
    /// A row with a known position.
    pub const fn located(detection: DetectionRow, position: GeoPoint) -> Self {
        Self {
            detection,
            position: Some(position),
        }
    }

    /// A row without coordinates.
    pub const fn unlocated(detection: DetectionRow) -> Self {
        Self {
            detection,
            position: None,
        }
    }
}

/// Rows that can be written as named fields.
pub trait RowFields {
    /// Fields in output order.
    fn fields(&self) -> Vec<Field>;

    /// Geographic position, if any.
    fn position(&self) -> Option<GeoPoint> {
        None
    }
}

impl RowFields for DetectionRow {
    fn fields(&self) -> Vec<Field> {
        let frame = i64::try_from(self.frame_index).unwrap_or(i64::MAX);
        let mut fields: Vec<Field> = vec![
            (columns::FRAME.to_string(), Some(Scalar::Int(frame))),
            (
                columns::TRACK_ID.to_string(),
                Some(Scalar::Int(self.track_id.to_sentinel())),
            ),
            (
                columns::CLASS_ID.to_string(),
                Some(Scalar::Int(i64::from(self.class_id))),
            ),
            (
                columns::CONFIDENCE.to_string(),
                Some(Scalar::Float(self.confidence)),
            ),
            (columns::XMIN.to_string(), Some(Scalar::Float(self.bbox.xmin))),
            (columns::YMIN.to_string(), Some(Scalar::Float(self.bbox.ymin))),
            (columns::XMAX.to_string(), Some(Scalar::Float(self.bbox.xmax))),
            (columns::YMAX.to_string(), Some(Scalar::Float(self.bbox.ymax))),
            (
                columns::SOURCE.to_string(),
                Some(Scalar::Text(self.source.clone())),
            ),
        ];
        fields.extend(
            self.extra
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.clone()))),
        );
        fields
    }
}

impl RowFields for EnrichedRow {
    fn fields(&self) -> Vec<Field> {
        let mut fields = self.detection.fields();
        fields.push((
            columns::LAT.to_string(),
            self.position.map(|p| Scalar::Float(p.lat)),
        ));
        fields.push((
            columns::LON.to_string(),
            self.position.map(|p| Scalar::Float(p.lon)),
        ));
        fields
    }

    fn position(&self) -> Option<GeoPoint> {
        self.position
    }
}
