//! Detection capability backed by recorded model output.
//!
//! A recording is JSON lines: each line is the prediction array one `detect`
//! call returned, e.g. `[{"class":"cat","score":0.9,"bbox":[0,0,10,10]}]`.
//! Batches are served in order and wrap around.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use crate::common::{BvrImage, BvrPrediction, ModelLoadError, ModelVariant};
use crate::detection_runners::{DetectionModel, ModelProvider};

#[derive(Debug, Clone)]
pub struct ReplayProvider {
    path: PathBuf,
    variants: Vec<ModelVariant>,
    latency: Duration,
}

impl ReplayProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            variants: vec![ModelVariant::Full, ModelVariant::Lite],
            latency: Duration::ZERO,
        }
    }

    pub fn with_variants(mut self, variants: &[ModelVariant]) -> Self {
        self.variants = variants.to_vec();
        self
    }

    /// Simulated inference time per `detect` call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// `<stem>.<variant>.jsonl` next to the recording when present, else the recording itself.
    pub fn recording_for(&self, variant: ModelVariant) -> PathBuf {
        let stem = self.path.file_stem().and_then(|s| s.to_str()).unwrap_or("predictions");
        let candidate = self.path.with_file_name(format!("{}.{}.jsonl", stem, variant.str_lowercase()));
        if candidate.exists() {
            candidate
        } else {
            self.path.clone()
        }
    }
}

pub fn parse_recording(raw: &str) -> anyhow::Result<Vec<Vec<BvrPrediction>>> {
    let mut batches = Vec::new();
    for (n, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let batch: Vec<BvrPrediction> = serde_json::from_str(line)
            .map_err(|err| anyhow::anyhow!("line {}: {}", n + 1, err))?;
        batches.push(batch);
    }
    Ok(batches)
}

impl ModelProvider for ReplayProvider {
    type Model = ReplayModel;

    async fn load(&self, variant: ModelVariant) -> Result<ReplayModel, ModelLoadError> {
        if !self.variants.contains(&variant) {
            return Err(ModelLoadError::UnsupportedVariant(variant));
        }
        let path = self.recording_for(variant);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ModelLoadError::Network(format!("{} not found", path.display())),
            _ => ModelLoadError::Provider(format!("{}: {}", path.display(), err)),
        })?;
        let batches = parse_recording(&raw)
            .map_err(|err| ModelLoadError::Provider(format!("{}: {}", path.display(), err)))?;
        log::debug!("Replay model {} holds {} batch(es)", variant, batches.len());

        Ok(ReplayModel {
            variant,
            batches,
            cursor: AtomicUsize::new(0),
            latency: self.latency,
        })
    }
}

#[derive(Debug)]
pub struct ReplayModel {
    variant: ModelVariant,
    batches: Vec<Vec<BvrPrediction>>,
    cursor: AtomicUsize,
    latency: Duration,
}

impl ReplayModel {
    pub fn from_batches(variant: ModelVariant, batches: Vec<Vec<BvrPrediction>>) -> Self {
        Self {
            variant,
            batches,
            cursor: AtomicUsize::new(0),
            latency: Duration::ZERO,
        }
    }

    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
}

impl DetectionModel for ReplayModel {
    fn variant(&self) -> ModelVariant {
        self.variant
    }

    async fn detect(&self, _frame: &BvrImage) -> anyhow::Result<Vec<BvrPrediction>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let n = self.cursor.fetch_add(1, Ordering::AcqRel);
        if self.batches.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.batches[n % self.batches.len()].clone())
    }
}
