use crate::common::{BvrImage, BvrPrediction, ModelLoadError, ModelVariant};

/// A loaded detection model.
#[allow(async_fn_in_trait)]
pub trait DetectionModel {
    fn variant(&self) -> ModelVariant;

    /// Runs detection on a frame. Boxes are in frame pixels.
    async fn detect(&self, frame: &BvrImage) -> anyhow::Result<Vec<BvrPrediction>>;
}

/// The external capability that produces models.
#[allow(async_fn_in_trait)]
pub trait ModelProvider {
    type Model: DetectionModel;

    async fn load(&self, variant: ModelVariant) -> Result<Self::Model, ModelLoadError>;
}
