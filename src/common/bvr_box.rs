use serde::{Deserialize, Serialize};

/// Axis aligned box in frame pixels, top-left anchored.
///
/// Serialised as the `[x, y, width, height]` array detection libraries emit.
#[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BvrBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl From<[f32; 4]> for BvrBox {
    fn from(xywh: [f32; 4]) -> Self {
        Self::new(xywh[0], xywh[1], xywh[2], xywh[3])
    }
}

impl From<BvrBox> for [f32; 4] {
    fn from(bbox: BvrBox) -> Self {
        [bbox.x, bbox.y, bbox.w, bbox.h]
    }
}

impl BvrBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f32 {
        self.w
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f32 {
        self.h
    }

    /// Returns the maximum x-coordinate of the bounding box.
    pub fn x_max(&self) -> f32 {
        self.x + self.w
    }

    /// Returns the maximum y-coordinate of the bounding box.
    pub fn y_max(&self) -> f32 {
        self.y + self.h
    }

    /// Returns the center x-coordinate of the bounding box.
    pub fn cx(&self) -> f32 {
        self.x + self.w / 2.
    }

    /// Returns the center y-coordinate of the bounding box.
    pub fn cy(&self) -> f32 {
        self.y + self.h / 2.
    }

    /// Returns the centroid as `(cx, cy)`.
    pub fn centroid(&self) -> (f32, f32) {
        (self.cx(), self.cy())
    }

    /// Returns the bounding box coordinates and size as `(x, y, w, h)`.
    pub fn xy_wh(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.w, self.h)
    }

    /// Sets the bounding box's coordinates and dimensions using `(cx, cy, w, h)`.
    ///
    /// # Arguments
    ///
    /// * `cx` - The x-coordinate of the horizontal center.
    /// * `cy` - The y-coordinate of the vertical center.
    /// * `w` - The width of the bounding box.
    /// * `h` - The height of the bounding box.
    ///
    /// # Returns
    ///
    /// A `BvrBox` instance with updated coordinates and dimensions.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x = cx - (w / 2.0);
        self.y = cy - (h / 2.0);
        self.w = w;
        self.h = h;
        self
    }
}
