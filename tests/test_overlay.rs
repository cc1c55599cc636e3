use std::time::{Duration, Instant};
use chrono::{TimeZone, Utc};
use image::Rgb;
use bvr_live::common::{filter_by_threshold, BvrBox, BvrImage, BvrPrediction};
use bvr_live::overlay::{snapshot_file_name, OverlayElement, OverlayKind, OverlayLayer,
                        OverlayRenderer, OverlaySurface, SnapshotExporter, Tracker};

mod fixtures;

fn batch(n: usize, offset: f32) -> Vec<BvrPrediction> {
    (0..n)
        .map(|i| BvrPrediction::new("car", 0.5 + i as f32 * 0.01, BvrBox::new(i as f32 * 20. + offset, 5., 15., 10.)))
        .collect()
}

#[test]
fn renders_one_box_and_label_per_passing_prediction() {
    let mut layer = OverlayLayer::new();
    let mut renderer = OverlayRenderer::new();
    let passing = filter_by_threshold(fixtures::cat_dog_batch(), 0.5);

    let summary = renderer.render(&mut layer, &passing, None, Instant::now());

    assert_eq!(summary.boxes, 1);
    assert_eq!(layer.count(OverlayKind::Box), 1);
    assert_eq!(layer.count(OverlayKind::Label), 1);
    assert_eq!(renderer.object_count(), 1);
    assert_eq!(summary.objects_list(), "1 cat");
    assert!(layer.iter().any(|e| matches!(e, OverlayElement::Label { text, .. } if text == "cat - 90%")));
}

#[test]
fn label_sits_on_box_corner() {
    let prediction = BvrPrediction::new("dog", 0.456, BvrBox::new(12., 30., 40., 20.));
    match OverlayElement::label(&prediction) {
        OverlayElement::Label { x, y, text } => {
            assert_eq!((x, y), (12., 30.));
            assert_eq!(text, "dog - 46%");
        }
        other => panic!("unexpected element {:?}", other),
    }
}

#[test]
fn each_cycle_replaces_the_previous_overlays() {
    let mut layer = OverlayLayer::new();
    let mut renderer = OverlayRenderer::new();
    let now = Instant::now();

    for n in [3, 5, 1, 4] {
        renderer.render(&mut layer, &batch(n, 0.), None, now);
        assert_eq!(layer.len(), n * 2);
    }
    let boxes: Vec<_> = layer.iter().filter(|e| e.kind() == OverlayKind::Box).cloned().collect();
    assert_eq!(boxes.len(), 4);
    assert_eq!(renderer.children().len(), 8);

    renderer.render(&mut layer, &[], None, now);
    assert!(layer.is_empty());
    assert_eq!(renderer.object_count(), 0);
}

#[test]
fn tracking_adds_lines_from_second_cycle_on() {
    let mut layer = OverlayLayer::new();
    let mut renderer = OverlayRenderer::new();
    let mut tracker = Tracker::default();
    let t0 = Instant::now();

    let first = renderer.render(&mut layer, &batch(2, 0.), Some(&mut tracker), t0);
    assert_eq!(first.track_lines, 0);
    assert_eq!(layer.count(OverlayKind::TrackLine), 0);

    let second = renderer.render(&mut layer, &batch(2, 3.), Some(&mut tracker), t0 + Duration::from_millis(100));
    assert_eq!(second.track_lines, 2);
    assert_eq!(layer.count(OverlayKind::TrackLine), 2);
    assert_eq!(layer.len(), 6);

    // lines of the previous cycle are evicted too
    renderer.render(&mut layer, &batch(1, 6.), Some(&mut tracker), t0 + Duration::from_millis(200));
    assert_eq!(layer.count(OverlayKind::TrackLine), 1);
    assert_eq!(layer.len(), 3);
}

#[test]
fn idle_slots_purged_even_without_detections() {
    let mut layer = OverlayLayer::new();
    let mut renderer = OverlayRenderer::new();
    let mut tracker = Tracker::default();
    let t0 = Instant::now();

    renderer.render(&mut layer, &batch(2, 0.), Some(&mut tracker), t0);
    assert_eq!(tracker.len(), 2);
    renderer.render(&mut layer, &[], Some(&mut tracker), t0 + Duration::from_millis(1001));
    assert!(tracker.is_empty());
}

#[test]
fn counts_follow_first_seen_order() {
    let mut layer = OverlayLayer::new();
    let mut renderer = OverlayRenderer::new();
    let predictions = vec![
        BvrPrediction::new("dog", 0.8, BvrBox::new(0., 0., 5., 5.)),
        BvrPrediction::new("cat", 0.8, BvrBox::new(5., 0., 5., 5.)),
        BvrPrediction::new("dog", 0.7, BvrBox::new(10., 0., 5., 5.)),
    ];
    let summary = renderer.render(&mut layer, &predictions, None, Instant::now());
    assert_eq!(summary.objects_list(), "2 dog, 1 cat");
    assert_eq!(summary.object_count(), 3);
}

#[test]
fn layer_remove_unknown_id_is_false() {
    let mut layer = OverlayLayer::new();
    let id = layer.append(OverlayElement::Box { x: 0., y: 0., width: 1., height: 1. });
    assert!(layer.remove(id));
    assert!(!layer.remove(id));
}

#[test]
fn snapshot_name_uses_iso_timestamp() {
    let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 41, 7).unwrap() + chrono::Duration::milliseconds(123);
    assert_eq!(snapshot_file_name(at), "detection-2026-10-18T09-41-07-123Z.png");
}

#[test]
fn compose_draws_boxes_and_label_strips() {
    let exporter = SnapshotExporter::new(std::env::temp_dir());
    let frame = BvrImage::blank(100, 100);
    let elements = vec![
        OverlayElement::Box { x: 10., y: 10., width: 20., height: 20. },
        OverlayElement::Label { x: 10., y: 40., text: "cat - 90%".to_string() },
    ];

    let img = exporter.compose(&frame, &elements);

    assert_eq!(*img.get_pixel(10, 10), Rgb([0, 255, 0]));
    assert_eq!(*img.get_pixel(11, 11), Rgb([0, 255, 0]));
    // box interior above the label strip
    assert_eq!(*img.get_pixel(20, 15), Rgb([0, 0, 0]));
    assert_eq!(*img.get_pixel(12, 25), Rgb([0, 80, 0]));
    // the source frame is left untouched
    assert_eq!(*frame.get_pixel(10, 10), Rgb([0, 0, 0]));
}

#[test]
fn compose_clips_labels_far_outside_the_frame() {
    let exporter = SnapshotExporter::new(std::env::temp_dir());
    let frame = BvrImage::blank(16, 16);
    let elements = vec![
        OverlayElement::Label { x: f32::MAX, y: f32::MIN, text: "cat - 90%".to_string() },
        OverlayElement::Label { x: -3e9, y: 3e9, text: "dog - 50%".to_string() },
        OverlayElement::Label { x: f32::MIN, y: 10., text: "bird - 70%".to_string() },
    ];

    let img = exporter.compose(&frame, &elements);

    assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
}

#[test]
fn export_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = SnapshotExporter::new(dir.path().join("captures"));
    let frame = BvrImage::blank(32, 32);
    let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

    let path = exporter.export(&frame, &[], at).unwrap();

    assert!(path.exists());
    assert_eq!(path.file_name().unwrap(), "detection-2026-01-02T03-04-05-000Z.png");
    let reread = image::open(&path).unwrap();
    assert_eq!((reread.width(), reread.height()), (32, 32));
}
