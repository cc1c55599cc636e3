//! Options read by the detection loop every cycle.

use std::path::Path;
use std::time::Duration;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::common::{ModelVariant, Resolution};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MIN_DETECTION_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub confidence_threshold: f32,
    pub model_variant: ModelVariant,
    pub resolution: Resolution,
    pub tracking_enabled: bool,
    pub min_detection_interval_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            model_variant: ModelVariant::Full,
            resolution: Resolution::default(),
            tracking_enabled: false,
            min_detection_interval_ms: DEFAULT_MIN_DETECTION_INTERVAL_MS,
        }
    }
}

impl DetectionConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DetectionConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()
    }

    pub fn validate(mut self) -> anyhow::Result<Self> {
        if !self.confidence_threshold.is_finite() {
            anyhow::bail!("confidence_threshold must be a number");
        }
        self.confidence_threshold = self.confidence_threshold.clamp(0., 1.);
        if self.resolution.width == 0 || self.resolution.height == 0 {
            anyhow::bail!("resolution must be non-zero, got {}", self.resolution);
        }
        Ok(self)
    }

    pub fn min_detection_interval(&self) -> Duration {
        Duration::from_millis(self.min_detection_interval_ms)
    }

    pub fn with_confidence_threshold(mut self, x: f32) -> Self {
        self.confidence_threshold = x.clamp(0., 1.);
        self
    }

    pub fn with_model_variant(mut self, x: ModelVariant) -> Self {
        self.model_variant = x;
        self
    }

    pub fn with_resolution(mut self, x: Resolution) -> Self {
        self.resolution = x;
        self
    }

    pub fn with_tracking(mut self, x: bool) -> Self {
        self.tracking_enabled = x;
        self
    }

    pub fn with_min_detection_interval(mut self, x: Duration) -> Self {
        self.min_detection_interval_ms = x.as_millis() as u64;
        self
    }

    pub fn to_string(&self) -> String {
        format!("Confidence Threshold: {}\n\
        Model Variant: {}\n\
        Resolution: {}\n\
        Tracking: {}\n\
        Min Detection Interval: {}ms",
                self.confidence_threshold, self.model_variant, self.resolution,
                if self.tracking_enabled { "ON" } else { "OFF" },
                self.min_detection_interval_ms)
    }
}
