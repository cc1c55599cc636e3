use std::time::Instant;
use crate::common::{count_by_class, BvrPrediction};
use crate::overlay::{OverlayElement, OverlayId, OverlaySurface, Tracker};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderSummary {
    pub boxes: usize,
    pub track_lines: usize,
    pub counts: Vec<(String, usize)>,
}

impl RenderSummary {
    pub fn object_count(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// `"1 cat, 2 dog"`, classes in first-seen order.
    pub fn objects_list(&self) -> String {
        self.counts
            .iter()
            .map(|(label, n)| format!("{} {}", n, label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Owns the overlays of the last accepted batch.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    children: Vec<OverlayId>,
    object_count: usize,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the previous cycle's overlays with ones for `batch`.
    ///
    /// `batch` is expected to be filtered by confidence already. With a tracker,
    /// every prediction also moves its slot and idle slots are purged afterwards.
    pub fn render<S: OverlaySurface>(&mut self, surface: &mut S, batch: &[BvrPrediction],
                                     mut tracker: Option<&mut Tracker>, now: Instant) -> RenderSummary {
        self.clear(surface);

        let mut summary = RenderSummary::default();
        for (i, prediction) in batch.iter().enumerate() {
            self.children.push(surface.append(OverlayElement::highlight(prediction)));
            self.children.push(surface.append(OverlayElement::label(prediction)));
            summary.boxes += 1;

            if let Some(tracker) = tracker.as_deref_mut() {
                if let Some(line) = tracker.track(i, prediction, now) {
                    self.children.push(surface.append(OverlayElement::TrackLine(line)));
                    summary.track_lines += 1;
                }
            }
        }

        if let Some(tracker) = tracker {
            tracker.purge(now);
        }

        summary.counts = count_by_class(batch);
        self.object_count = summary.object_count();
        summary
    }

    /// Removes every overlay this renderer created.
    pub fn clear<S: OverlaySurface>(&mut self, surface: &mut S) {
        for id in self.children.drain(..) {
            if !surface.remove(id) {
                log::warn!("Overlay {} was already gone from the surface", id);
            }
        }
        self.object_count = 0;
    }

    pub fn object_count(&self) -> usize {
        self.object_count
    }

    pub fn children(&self) -> &[OverlayId] {
        &self.children
    }
}
