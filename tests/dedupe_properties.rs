//! Integration tests for greedy spatial deduplication.

use nivaro::constants::METERS_PER_DEGREE;
use nivaro::report::{SpatialDeduplicator, approx_distance_m};
use nivaro::row::{BoundingBox, DetectionRow, EnrichedRow, GeoPoint, Metadata, TrackId};
use tracing::Span;

fn row(frame: u64, position: Option<(f64, f64)>) -> EnrichedRow {
    let detection = DetectionRow {
        frame_index: frame,
        track_id: TrackId::new(u32::try_from(frame).unwrap_or(0)),
        class_id: 0,
        confidence: 0.9,
        bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
        source: "cam".to_string(),
        extra: Metadata::new(),
    };
    match position {
        Some((lat, lon)) => EnrichedRow::located(detection, GeoPoint::new(lat, lon)),
        None => EnrichedRow::unlocated(detection),
    }
}

fn frames(rows: &[EnrichedRow]) -> Vec<u64> {
    rows.iter().map(|r| r.detection.frame_index).collect()
}

fn dedupe(threshold_m: f64, rows: Vec<EnrichedRow>) -> Vec<EnrichedRow> {
    SpatialDeduplicator::new(threshold_m, Span::none()).dedupe(rows)
}

/// Three points along a parallel, `spacing_m` apart.
fn colinear(spacing_m: f64) -> [EnrichedRow; 3] {
    let step = spacing_m / METERS_PER_DEGREE;
    [
        row(0, Some((10.0, 20.0))),
        row(1, Some((10.0, 20.0 + step))),
        row(2, Some((10.0, 20.0 + 2.0 * step))),
    ]
}

#[test]
fn test_close_rows_collapse_at_five_meters() {
    let rows = vec![row(0, Some((10.0, 20.0))), row(1, Some((10.0, 20.00004)))];
    let kept = dedupe(5.0, rows);
    assert_eq!(frames(&kept), vec![0]);
}

#[test]
fn test_close_rows_survive_at_one_meter() {
    let rows = vec![row(0, Some((10.0, 20.0))), row(1, Some((10.0, 20.00004)))];
    let kept = dedupe(1.0, rows);
    assert_eq!(frames(&kept), vec![0, 1]);
}

#[test]
fn test_result_depends_on_arrival_order() {
    let [a, b, c] = colinear(3.0);

    let forward = dedupe(5.0, vec![a.clone(), b.clone(), c.clone()]);
    assert_eq!(frames(&forward), vec![0, 2]);

    let shuffled = dedupe(5.0, vec![b, a, c]);
    assert_eq!(frames(&shuffled), vec![1]);
}

#[test]
fn test_rows_without_position_always_survive() {
    let rows = vec![
        row(0, None),
        row(1, Some((1.0, 1.0))),
        row(2, None),
        row(3, Some((1.0, 1.0))),
        row(4, None),
    ];
    let kept = dedupe(5.0, rows);
    assert_eq!(frames(&kept), vec![0, 1, 2, 4]);
}

#[test]
fn test_survivors_are_pairwise_separated() {
    let rows: Vec<EnrichedRow> = (0..40u32)
        .map(|i| {
            let offset = f64::from(i % 7) * 2.0 / METERS_PER_DEGREE;
            let lat = 45.0 + f64::from(i / 7) * 4.0 / METERS_PER_DEGREE;
            row(u64::from(i), Some((lat, 7.0 + offset)))
        })
        .collect();

    let kept = dedupe(5.0, rows);
    for (i, a) in kept.iter().enumerate() {
        for b in &kept[i + 1..] {
            let (Some(pa), Some(pb)) = (a.position, b.position) else {
                continue;
            };
            assert!(approx_distance_m(pa, pb) > 5.0);
        }
    }
}

#[test]
fn test_preserves_input_order_and_is_idempotent() {
    let rows = vec![
        row(5, Some((0.0, 0.0))),
        row(3, Some((0.0, 1.0))),
        row(9, None),
        row(1, Some((0.0, 0.00001))),
        row(2, Some((1.0, 0.0))),
    ];

    let once = dedupe(5.0, rows);
    assert_eq!(frames(&once), vec![5, 3, 9, 2]);

    let twice = dedupe(5.0, once.clone());
    assert_eq!(twice, once);
}

#[test]
fn test_clusters_record_absorbed_positions() {
    let [a, b, c] = colinear(3.0);
    let clusters = SpatialDeduplicator::new(5.0, Span::none()).clusters(vec![b, a, c]);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].position, 0);
    assert_eq!(clusters[0].absorbed, vec![1, 2]);
    assert_eq!(clusters[0].size(), 3);
}
