use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use rand::Rng;
use crate::common::{ModelLoadError, ModelVariant};
use crate::data::LoadProgress;
use crate::detection_runners::ModelProvider;

pub const PROGRESS_STEP: Duration = Duration::from_millis(200);
/// Coarse progress stops advancing on its own once it reaches this value.
pub const PROGRESS_SOFT_CAP: f32 = 80.;
const PROGRESS_MAX_INCREMENT: f32 = 10.;

type Outcome = (ModelVariant, Result<(), ModelLoadError>);

/// Acquires models from a provider and holds the current one.
///
/// Only one load runs at a time. A caller arriving while a load is in flight
/// waits for it; when it asked for the same variant it adopts that outcome
/// instead of loading again.
pub struct ModelLoader<P: ModelProvider> {
    provider: P,
    current: Mutex<Option<Arc<P::Model>>>,
    in_flight: tokio::sync::Mutex<()>,
    finished: AtomicU64,
    last_outcome: Mutex<Option<Outcome>>,
    progress_tx: Option<Sender<LoadProgress>>,
    progress_step: Duration,
}

impl<P: ModelProvider> ModelLoader<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            current: Mutex::new(None),
            in_flight: tokio::sync::Mutex::new(()),
            finished: AtomicU64::new(0),
            last_outcome: Mutex::new(None),
            progress_tx: None,
            progress_step: PROGRESS_STEP,
        }
    }

    pub fn with_progress(mut self, tx: Sender<LoadProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_progress_step(mut self, step: Duration) -> Self {
        self.progress_step = step;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn current(&self) -> Option<Arc<P::Model>> {
        self.current.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Number of load attempts that have run to completion, successful or not.
    pub fn attempts(&self) -> u64 {
        self.finished.load(Ordering::Acquire)
    }

    /// Returns the current model, loading `variant` first when there is none.
    pub async fn ensure_loaded(&self, variant: ModelVariant) -> Result<Arc<P::Model>, ModelLoadError> {
        if let Some(model) = self.current() {
            return Ok(model);
        }
        self.load(variant).await
    }

    /// Loads `variant` and makes it the current model.
    pub async fn load(&self, variant: ModelVariant) -> Result<Arc<P::Model>, ModelLoadError> {
        let seen = self.finished.load(Ordering::Acquire);
        let _guard = self.in_flight.lock().await;

        if self.finished.load(Ordering::Acquire) != seen {
            let last = self.last_outcome.lock().clone();
            match last {
                Some((done, Ok(()))) if done == variant => {
                    if let Some(model) = self.current() {
                        log::debug!("Adopting in-flight load of {}", variant);
                        return Ok(model);
                    }
                }
                Some((done, Err(err))) if done == variant => {
                    log::debug!("In-flight load of {} failed, not retrying", variant);
                    return Err(err);
                }
                _ => {}
            }
        }

        let started = Instant::now();
        log::info!("Loading {} model", variant);
        self.emit(LoadProgress::Started(variant));
        self.emit(LoadProgress::Percent(0));

        let result = self.load_with_progress(variant).await;

        let outcome = match result {
            Ok(model) => {
                let model = Arc::new(model);
                // Previous model is dropped here, not merged.
                *self.current.lock() = Some(model.clone());
                self.emit(LoadProgress::Percent(100));
                self.emit(LoadProgress::Completed(variant));
                log::info!("{} model loaded in {:.2?}", variant, started.elapsed());
                Ok(model)
            }
            Err(err) => {
                log::error!("Model loading failed: {}", err);
                self.emit(LoadProgress::Failed(err.to_string()));
                Err(err)
            }
        };

        *self.last_outcome.lock() = Some((variant, outcome.as_ref().map(|_| ()).map_err(|e| e.clone())));
        self.finished.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn load_with_progress(&self, variant: ModelVariant) -> Result<P::Model, ModelLoadError> {
        let load = self.provider.load(variant);
        tokio::pin!(load);

        let start = tokio::time::Instant::now() + self.progress_step;
        let mut ticker = tokio::time::interval_at(start, self.progress_step);
        let mut progress = 0f32;
        let mut reported = 0u8;

        loop {
            tokio::select! {
                result = &mut load => return result,
                _ = ticker.tick(), if progress < PROGRESS_SOFT_CAP => {
                    progress += rand::thread_rng().gen_range(0.0..PROGRESS_MAX_INCREMENT);
                    let percent = progress.floor().min(99.) as u8;
                    if percent > reported {
                        reported = percent;
                        self.emit(LoadProgress::Percent(percent));
                    }
                }
            }
        }
    }

    fn emit(&self, progress: LoadProgress) {
        if let Some(tx) = &self.progress_tx {
            if tx.send(progress).is_err() {
                log::trace!("Progress receiver dropped");
            }
        }
    }
}
