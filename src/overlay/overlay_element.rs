use serde::Serialize;
use crate::common::BvrPrediction;

/// Vertical offset of a label relative to its box's top edge.
pub const LABEL_OFFSET_Y: f32 = 0.;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OverlayKind {
    Box,
    Label,
    TrackLine,
}

/// Segment from a slot's previous centroid to its new centroid.
///
/// Anchored at `(x, y)` and rotated by `angle` radians, the way the segment is
/// positioned on a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackLine {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub angle: f32,
}

impl TrackLine {
    pub fn between(from: (f32, f32), to: (f32, f32)) -> Self {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        Self {
            x: from.0,
            y: from.1,
            length: (dx * dx + dy * dy).sqrt(),
            angle: dy.atan2(dx),
        }
    }

    pub fn start(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn end(&self) -> (f32, f32) {
        (self.x + self.length * self.angle.cos(),
         self.y + self.length * self.angle.sin())
    }
}

/// A non-interactive element drawn above the video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OverlayElement {
    Box { x: f32, y: f32, width: f32, height: f32 },
    Label { x: f32, y: f32, text: String },
    TrackLine(TrackLine),
}

impl OverlayElement {
    pub fn highlight(prediction: &BvrPrediction) -> Self {
        let (x, y, width, height) = prediction.bbox.xy_wh();
        OverlayElement::Box { x, y, width, height }
    }

    pub fn label(prediction: &BvrPrediction) -> Self {
        OverlayElement::Label {
            x: prediction.bbox.x,
            y: prediction.bbox.y + LABEL_OFFSET_Y,
            text: prediction.label_text(),
        }
    }

    pub fn kind(&self) -> OverlayKind {
        match self {
            OverlayElement::Box { .. } => OverlayKind::Box,
            OverlayElement::Label { .. } => OverlayKind::Label,
            OverlayElement::TrackLine(_) => OverlayKind::TrackLine,
        }
    }
}
