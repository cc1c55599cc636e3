//! Frame-to-frame centroid tracking.
//!
//! Slots are keyed by a prediction's index in the filtered batch, not by object
//! identity. When the model reorders its output between frames a line can join
//! two unrelated objects.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use crate::common::BvrPrediction;
use crate::overlay::TrackLine;

pub const TRACK_IDLE_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSlot {
    pub x: f32,
    pub y: f32,
    pub label: String,
    pub last_seen_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Tracker {
    slots: HashMap<usize, TrackingSlot>,
    idle_window: Duration,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(TRACK_IDLE_WINDOW)
    }
}

impl Tracker {
    pub fn new(idle_window: Duration) -> Self {
        Self {
            slots: HashMap::new(),
            idle_window,
        }
    }

    /// Moves slot `index` to the prediction's centroid. Returns the segment
    /// from the previous centroid when the slot was already occupied.
    pub fn track(&mut self, index: usize, prediction: &BvrPrediction, now: Instant) -> Option<TrackLine> {
        let centroid = prediction.bbox.centroid();
        let line = self
            .slots
            .get(&index)
            .map(|prev| TrackLine::between((prev.x, prev.y), centroid));

        self.slots.insert(index, TrackingSlot {
            x: centroid.0,
            y: centroid.1,
            label: prediction.label.clone(),
            last_seen_at: now,
        });
        line
    }

    /// Drops every slot idle for longer than the window. Returns how many went.
    pub fn purge(&mut self, now: Instant) -> usize {
        let before = self.slots.len();
        let idle_window = self.idle_window;
        self.slots
            .retain(|_, slot| now.saturating_duration_since(slot.last_seen_at) <= idle_window);
        let purged = before - self.slots.len();
        if purged > 0 {
            log::trace!("Tracker purged {} idle slot(s)", purged);
        }
        purged
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn slot(&self, index: usize) -> Option<&TrackingSlot> {
        self.slots.get(&index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
