//! Stage runners: each reads its inputs from disk, drives the components
//! and writes its outputs.

use crate::config::ReportSettings;
use crate::error::Result;
use crate::gps::{GpsIndex, MetadataJoiner};
use crate::output::progress::{create_frame_progress, finish_progress};
use crate::output::{read_detection_table, write_rows};
use crate::report::{ReportArtifacts, ReportBuilder};
use crate::row::{DetectionRow, EnrichedRow, Metadata};
use crate::tracking::{FrameMetadataTable, MetadataFn, NdjsonFrameSource, TrackExtractor};
use std::path::Path;
use tracing::{info, info_span};

/// Extract detection rows from an NDJSON frame stream.
///
/// When `metadata` is given, each frame's row from that table is attached
/// to all of its detections.
pub fn extract_rows(
    frames: &Path,
    metadata: Option<&Path>,
    show_progress: bool,
) -> Result<Vec<DetectionRow>> {
    let span = info_span!("track", frames = %frames.display());

    let table = metadata.map(FrameMetadataTable::from_csv).transpose()?;
    let mut lookup = table
        .as_ref()
        .map(|table| move |frame: u64| -> Metadata { table.lookup(frame) });

    let source = NdjsonFrameSource::open(frames)?;
    let label = frames
        .file_name()
        .map_or_else(|| frames.display().to_string(), |n| n.to_string_lossy().into_owned());
    let pb = create_frame_progress(&label, show_progress);

    let extractor = TrackExtractor::new(span);
    let result = extractor.extract(
        source,
        lookup.as_mut().map(|f| f as &mut MetadataFn<'_>),
        pb.as_ref(),
    );
    finish_progress(pb, "done");
    result
}

/// Join a detection table with GPS fixes and write the enriched table.
///
/// Returns the number of rows written.
pub fn sync_table(detections: &Path, gps: &Path, output: &Path) -> Result<usize> {
    let span = info_span!("sync");

    let rows = read_detection_table(detections)?;
    let index = GpsIndex::from_csv(gps)?;
    let joiner = MetadataJoiner::new(&index, span.clone());
    let enriched = joiner.join_all(rows.into_iter().map(|row| row.detection));

    write_rows(output, &enriched)?;
    span.in_scope(|| info!("Wrote {} row(s) to {}", enriched.len(), output.display()));
    Ok(enriched.len())
}

/// Build report artifacts from an enriched detection table.
pub fn report_table(input: &Path, settings: ReportSettings) -> Result<ReportArtifacts> {
    let rows: Vec<EnrichedRow> = read_detection_table(input)?;
    ReportBuilder::new(settings, info_span!("report")).build(rows)
}

/// Run extraction, GPS join and reporting in one pass.
///
/// The tracking log is written before the join when `tracking_output` is set.
pub fn run_pipeline(
    frames: &Path,
    metadata: Option<&Path>,
    gps: &Path,
    tracking_output: Option<&Path>,
    settings: ReportSettings,
    show_progress: bool,
) -> Result<ReportArtifacts> {
    let rows = extract_rows(frames, metadata, show_progress)?;
    if let Some(path) = tracking_output {
        write_rows(path, &rows)?;
        info!("Wrote tracking log to {}", path.display());
    }

    let index = GpsIndex::from_csv(gps)?;
    let enriched = MetadataJoiner::new(&index, info_span!("sync")).join_all(rows);

    ReportBuilder::new(settings, info_span!("report")).build(enriched)
}
