//! Conversion of upstream frame results into detection rows.

use crate::constants::columns;
use crate::error::Result;
use crate::row::{BoundingBox, DetectionRow, Metadata, TrackId};
use crate::tracking::{FrameResult, RawDetection};
use indicatif::ProgressBar;
use std::collections::HashSet;
use tracing::{Span, debug, info, warn};

/// Caller-supplied metadata for a frame index. Invoked at most once per frame.
pub type MetadataFn<'a> = dyn FnMut(u64) -> Metadata + 'a;

/// Normalizes upstream frame results into [`DetectionRow`]s.
pub struct TrackExtractor {
    span: Span,
}

impl TrackExtractor {
    /// Create an extractor that logs within `span`.
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Convert one frame's result into rows.
    ///
    /// Confidence and box values are copied verbatim. Every row of the frame
    /// shares the same `metadata` snapshot; keys that name a fixed field are
    /// expected to have been stripped already (see [`strip_reserved`]).
    pub fn extract_frame(
        &self,
        result: &FrameResult,
        frame_index: u64,
        metadata: Option<&Metadata>,
    ) -> Vec<DetectionRow> {
        result
            .detections()
            .iter()
            .map(|det| self.to_row(det, frame_index, &result.source, metadata))
            .collect()
    }

    fn to_row(
        &self,
        det: &RawDetection,
        frame_index: u64,
        source: &str,
        metadata: Option<&Metadata>,
    ) -> DetectionRow {
        let bbox = BoundingBox::new(det.xmin, det.ymin, det.xmax, det.ymax);
        if !bbox.is_well_formed() {
            self.span.in_scope(|| {
                warn!(
                    "Frame {frame_index}: malformed bounding box ({}, {}, {}, {}) kept as-is",
                    bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax
                );
            });
        }

        DetectionRow {
            frame_index,
            track_id: det.track_id.map_or(TrackId::UNTRACKED, TrackId::from_sentinel),
            class_id: det.class_id,
            confidence: det.confidence,
            bbox,
            source: source.to_string(),
            extra: metadata.cloned().unwrap_or_default(),
        }
    }

    /// Consume a lazy sequence of frame results and accumulate all rows.
    ///
    /// Frames without an explicit index are numbered from the previous
    /// frame's index + 1, starting at 0. The first upstream error aborts
    /// extraction.
    pub fn extract<I>(
        &self,
        frames: I,
        mut metadata_fn: Option<&mut MetadataFn<'_>>,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<DetectionRow>>
    where
        I: IntoIterator<Item = Result<FrameResult>>,
    {
        let _enter = self.span.enter();

        let mut rows = Vec::new();
        let mut next_index: u64 = 0;
        let mut frame_count: u64 = 0;
        let mut warned_keys = HashSet::new();

        for frame in frames {
            let frame = frame?;
            let frame_index = frame.frame.unwrap_or(next_index);
            if frame_index < next_index {
                warn!("Frame index {frame_index} is not increasing (expected >= {next_index})");
            }
            next_index = frame_index.saturating_add(1);
            frame_count += 1;

            let metadata = metadata_fn.as_mut().map(|f| {
                let mut metadata = f(frame_index);
                strip_reserved(&mut metadata, &mut warned_keys);
                metadata
            });

            let frame_rows = self.extract_frame(&frame, frame_index, metadata.as_ref());
            debug!("Frame {frame_index}: {} detection(s)", frame_rows.len());
            rows.extend(frame_rows);

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        info!(
            "Extracted {} detection row(s) from {frame_count} frame(s)",
            rows.len()
        );
        Ok(rows)
    }
}

/// Remove metadata keys that would shadow a fixed row field.
///
/// Each offending key is reported once per `warned` set.
pub fn strip_reserved(metadata: &mut Metadata, warned: &mut HashSet<String>) {
    metadata.retain(|key, _| {
        if columns::is_reserved(key) {
            if warned.insert(key.to_string()) {
                warn!("Ignoring metadata key '{key}': it names a fixed detection field");
            }
            false
        } else {
            true
        }
    });
}
