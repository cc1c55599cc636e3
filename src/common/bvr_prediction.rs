use serde::{Deserialize, Serialize};
use crate::common::BvrBox;

/// One object reported by the model for a frame.
#[derive(Default, Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct BvrPrediction {
    #[serde(rename = "class")]
    pub label: String,
    pub score: f32,
    pub bbox: BvrBox,
}

impl BvrPrediction {
    pub fn new(label: &str, score: f32, bbox: BvrBox) -> Self {
        Self {
            label: label.to_string(),
            score,
            bbox,
        }
    }

    /// Sets the bounding box using `(x, y, w, h)`.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = BvrBox::new(x, y, w, h);
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// True when the score meets or exceeds `threshold`.
    pub fn passes(&self, threshold: f32) -> bool {
        self.score >= threshold
    }

    /// Score as a whole percentage, rounded half away from zero.
    pub fn percent(&self) -> u32 {
        (self.score as f64 * 100.).round().max(0.) as u32
    }

    /// Overlay label text, `"<class> - <pct>%"`.
    pub fn label_text(&self) -> String {
        format!("{} - {}%", self.label, self.percent())
    }
}

/// Keeps the predictions whose score meets `threshold`, preserving batch order.
pub fn filter_by_threshold(predictions: Vec<BvrPrediction>, threshold: f32) -> Vec<BvrPrediction> {
    predictions.into_iter().filter(|p| p.passes(threshold)).collect()
}

/// Per-class counts in first-seen order.
pub fn count_by_class(predictions: &[BvrPrediction]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for prediction in predictions {
        match counts.iter_mut().find(|(label, _)| *label == prediction.label) {
            Some((_, count)) => *count += 1,
            None => counts.push((prediction.label.clone(), 1)),
        }
    }
    counts
}
