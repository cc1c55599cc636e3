#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use bvr_live::common::{BvrBox, BvrImage, BvrPrediction, ModelLoadError, ModelVariant};
use bvr_live::detection_runners::{CaptureHandle, DetectionModel, ModelProvider, ReplayModel};

pub fn cat_dog_batch() -> Vec<BvrPrediction> {
    vec![
        BvrPrediction::new("cat", 0.9, BvrBox::new(0., 0., 10., 10.)),
        BvrPrediction::new("dog", 0.3, BvrBox::new(5., 5., 10., 10.)),
    ]
}

pub fn frame() -> BvrImage {
    BvrImage::blank(64, 48)
}

/// Hands out replay models over fixed batches, counting loads.
#[derive(Clone)]
pub struct FixedProvider {
    pub batches: Vec<Vec<BvrPrediction>>,
    pub loads: Arc<AtomicUsize>,
    pub delay: Duration,
    pub fail_with: Option<ModelLoadError>,
}

impl FixedProvider {
    pub fn new(batches: Vec<Vec<BvrPrediction>>) -> Self {
        Self {
            batches,
            loads: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
            fail_with: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, err: ModelLoadError) -> Self {
        self.fail_with = Some(err);
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelProvider for FixedProvider {
    type Model = ReplayModel;

    async fn load(&self, variant: ModelVariant) -> Result<ReplayModel, ModelLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(ReplayModel::from_batches(variant, self.batches.clone()))
    }
}

/// Fails every `fail_every`-th call, otherwise returns `batch`.
pub struct FlakyModel {
    pub batch: Vec<BvrPrediction>,
    pub calls: AtomicUsize,
    pub fail_every: usize,
}

impl DetectionModel for FlakyModel {
    fn variant(&self) -> ModelVariant {
        ModelVariant::Full
    }

    async fn detect(&self, _frame: &BvrImage) -> anyhow::Result<Vec<BvrPrediction>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n % self.fail_every == 0 {
            anyhow::bail!("tensor backend out of memory");
        }
        Ok(self.batch.clone())
    }
}

/// Tears the capture source down while its `detect` call is pending.
pub struct TeardownModel {
    pub handle: CaptureHandle,
    pub batch: Vec<BvrPrediction>,
}

impl DetectionModel for TeardownModel {
    fn variant(&self) -> ModelVariant {
        ModelVariant::Full
    }

    async fn detect(&self, _frame: &BvrImage) -> anyhow::Result<Vec<BvrPrediction>> {
        tokio::task::yield_now().await;
        self.handle.stop();
        Ok(self.batch.clone())
    }
}
