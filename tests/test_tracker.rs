use std::time::{Duration, Instant};
use bvr_live::common::{BvrBox, BvrPrediction};
use bvr_live::overlay::{TrackLine, Tracker};

fn at(cx: f32, cy: f32) -> BvrPrediction {
    BvrPrediction::new("person", 0.8, BvrBox::default().with_cxcy_wh(cx, cy, 10., 10.))
}

#[test]
fn first_sighting_draws_no_line() {
    let mut tracker = Tracker::default();
    let line = tracker.track(0, &at(10., 10.), Instant::now());
    assert!(line.is_none());
    let slot = tracker.slot(0).unwrap();
    assert_eq!((slot.x, slot.y), (10., 10.));
    assert_eq!(slot.label, "person");
}

#[test]
fn line_joins_consecutive_centroids() {
    let mut tracker = Tracker::default();
    let t0 = Instant::now();
    tracker.track(3, &at(10., 10.), t0);
    let line = tracker.track(3, &at(13., 14.), t0 + Duration::from_millis(100)).unwrap();

    assert_eq!(line.start(), (10., 10.));
    assert!((line.length - 5.).abs() < 1e-5);
    assert!((line.angle - 4f32.atan2(3.)).abs() < 1e-6);
    assert!((line.angle - 0.927).abs() < 1e-3);
    let (ex, ey) = line.end();
    assert!((ex - 13.).abs() < 1e-4 && (ey - 14.).abs() < 1e-4);

    let slot = tracker.slot(3).unwrap();
    assert_eq!((slot.x, slot.y), (13., 14.));
}

#[test]
fn slots_are_keyed_by_index_only() {
    let mut tracker = Tracker::default();
    let t0 = Instant::now();
    tracker.track(0, &at(0., 0.), t0);
    let line = tracker.track(0, &at(30., 40.).with_label("dog"), t0).unwrap();
    assert!((line.length - 50.).abs() < 1e-4);
    assert_eq!(tracker.slot(0).unwrap().label, "dog");
}

#[test]
fn idle_slot_is_purged_after_window() {
    let mut tracker = Tracker::default();
    let t0 = Instant::now();
    tracker.track(0, &at(10., 10.), t0);
    tracker.track(1, &at(50., 50.), t0 + Duration::from_millis(900));

    assert_eq!(tracker.purge(t0 + Duration::from_millis(1000)), 0);
    assert!(tracker.slot(0).is_some());

    assert_eq!(tracker.purge(t0 + Duration::from_millis(1001)), 1);
    assert!(tracker.slot(0).is_none());
    assert!(tracker.slot(1).is_some());
}

#[test]
fn clear_drops_every_slot() {
    let mut tracker = Tracker::default();
    let now = Instant::now();
    for i in 0..4 {
        tracker.track(i, &at(i as f32, 0.), now);
    }
    assert_eq!(tracker.len(), 4);
    tracker.clear();
    assert!(tracker.is_empty());
}

#[test]
fn track_line_between_same_point_is_zero_length() {
    let line = TrackLine::between((7., 7.), (7., 7.));
    assert_eq!(line.length, 0.);
    assert_eq!(line.angle, 0.);
}
