//! Upstream frame results.
//!
//! The detection/tracking model is an external collaborator. Its output is
//! consumed as newline-delimited JSON, one object per processed frame:
//!
//! ```json
//! {"source": "drive.mp4", "frame": 12, "detections": [
//!   {"xmin": 10.0, "ymin": 20.0, "xmax": 50.0, "ymax": 80.0,
//!    "confidence": 0.91, "class_id": 0, "track_id": 4}
//! ]}
//! ```
//!
//! `frame` and `track_id` are optional; `detections` may be missing or null.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// One detection as reported by the upstream tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Bounding box left edge.
    pub xmin: f64,
    /// Bounding box top edge.
    pub ymin: f64,
    /// Bounding box right edge.
    pub xmax: f64,
    /// Bounding box bottom edge.
    pub ymax: f64,
    /// Detection confidence.
    pub confidence: f64,
    /// Class category.
    pub class_id: u32,
    /// Tracker identity, absent when the tracker assigned none.
    #[serde(default)]
    pub track_id: Option<i64>,
}

/// Output of the upstream model for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// Originating media identifier.
    pub source: String,
    /// Explicit frame index, when the producer skips frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,
    /// Detections, `None` when the model produced no boxes at all.
    #[serde(default)]
    pub detections: Option<Vec<RawDetection>>,
}

impl FrameResult {
    /// Detections in this frame (empty when none were produced).
    pub fn detections(&self) -> &[RawDetection] {
        self.detections.as_deref().unwrap_or_default()
    }
}

/// Lazy, single-pass reader of NDJSON frame results.
pub struct NdjsonFrameSource<R> {
    lines: Lines<R>,
    line: usize,
}

impl NdjsonFrameSource<BufReader<File>> {
    /// Open a frame results file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::FrameSourceOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> NdjsonFrameSource<R> {
    /// Wrap any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for NdjsonFrameSource<R> {
    type Item = Result<FrameResult>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line += 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(Error::FrameParse {
                        line: self.line,
                        source: Box::new(e),
                    }));
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(&line).map_err(|e| Error::FrameParse {
                    line: self.line,
                    source: Box::new(e),
                }),
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_frames_lazily() {
        let input = concat!(
            r#"{"source":"a.mp4","detections":[{"xmin":1,"ymin":2,"xmax":3,"ymax":4,"confidence":0.9,"class_id":1,"track_id":5}]}"#,
            "\n\n",
            r#"{"source":"a.mp4","detections":null}"#,
            "\n",
            r#"{"source":"a.mp4","frame":7}"#,
            "\n",
        );
        let frames: Vec<FrameResult> = NdjsonFrameSource::new(Cursor::new(input))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].detections().len(), 1);
        assert_eq!(frames[0].detections()[0].track_id, Some(5));
        assert!(frames[1].detections().is_empty());
        assert_eq!(frames[2].frame, Some(7));
        assert!(frames[2].detections().is_empty());
    }

    #[test]
    fn test_reports_line_number_on_bad_json() {
        let input = "{\"source\":\"a\"}\n\nnot json\n";
        let mut source = NdjsonFrameSource::new(Cursor::new(input));
        assert!(source.next().unwrap().is_ok());
        let err = source.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::FrameParse { line: 3, .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let result = NdjsonFrameSource::open(Path::new("/nonexistent/frames.ndjson"));
        assert!(matches!(result, Err(Error::FrameSourceOpen { .. })));
    }
}
