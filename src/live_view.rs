//! The live view session: the control surface around the detection loop.

use std::path::PathBuf;
use std::time::Instant;
use anyhow::Context;
use chrono::Utc;
use crossbeam_channel::Receiver;
use crate::common::{BvrImage, ModelLoadError, ModelVariant, Resolution};
use crate::data::{ControlCommand, DetectionConfig, FsAccess, HistoryLog, TimeCalc};
use crate::detection_runners::{CaptureConstraints, CaptureSource, CycleOutcome, CycleState,
                               DetectionLoop, LoopState, ModelLoader, ModelProvider};
use crate::overlay::{OverlaySurface, SnapshotExporter, Tracker};

pub const MODEL_FAILED_MESSAGE: &str = "Model failed to load. Please check your connection and refresh.";

pub struct LiveView<P: ModelProvider, S: CaptureSource, O: OverlaySurface> {
    loader: ModelLoader<P>,
    source: S,
    surface: O,
    cycle: CycleState,
    detection_loop: DetectionLoop,
    camera_enabled: bool,
    controls: Option<Receiver<ControlCommand>>,
    exporter: Option<SnapshotExporter>,
}

impl<P: ModelProvider, S: CaptureSource, O: OverlaySurface> LiveView<P, S, O> {
    pub fn new(loader: ModelLoader<P>, source: S, surface: O, config: DetectionConfig) -> Self {
        Self {
            loader,
            source,
            surface,
            cycle: CycleState::new(config),
            detection_loop: DetectionLoop::default(),
            camera_enabled: false,
            controls: None,
            exporter: None,
        }
    }

    pub fn with_controls(mut self, cmd_rx: Receiver<ControlCommand>) -> Self {
        self.controls = Some(cmd_rx);
        self
    }

    pub fn with_exporter(mut self, exporter: SnapshotExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn with_detection_loop(mut self, detection_loop: DetectionLoop) -> Self {
        self.detection_loop = detection_loop;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.cycle.config
    }

    pub fn history(&self) -> &HistoryLog {
        &self.cycle.history
    }

    pub fn stats(&self) -> &TimeCalc {
        &self.cycle.stats
    }

    pub fn tracker(&self) -> &Tracker {
        &self.cycle.tracker
    }

    pub fn object_count(&self) -> usize {
        self.cycle.renderer.object_count()
    }

    pub fn loader(&self) -> &ModelLoader<P> {
        &self.loader
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn surface(&self) -> &O {
        &self.surface
    }

    pub fn loop_state(&self) -> LoopState {
        self.detection_loop.state()
    }

    pub fn detect_calls(&self) -> u64 {
        self.detection_loop.detect_calls()
    }

    pub fn is_camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    /// Makes sure a model is loaded, then opens the capture source.
    pub async fn enable_camera(&mut self) -> anyhow::Result<()> {
        if self.loader.current().is_none() {
            let variant = self.cycle.config.model_variant;
            if let Err(err) = self.load_model(variant).await {
                self.cycle.history.error(MODEL_FAILED_MESSAGE);
                return Err(err).context("Camera not enabled");
            }
        }

        let constraints = CaptureConstraints::new(self.cycle.config.resolution);
        match self.source.open(&constraints) {
            Ok(()) => {
                self.camera_enabled = true;
                self.detection_loop.reset();
                self.cycle.history.info("Webcam enabled");
                log::info!("Webcam enabled at {}", constraints.resolution);
                Ok(())
            }
            Err(err) => {
                log::error!("Webcam error: {}", err);
                self.camera_enabled = false;
                self.cycle.history.error("Webcam access denied");
                Err(err.into())
            }
        }
    }

    /// Loads `variant`, replacing the current model on success.
    pub async fn change_model(&mut self, variant: ModelVariant) -> Result<(), ModelLoadError> {
        self.load_model(variant).await.map_err(|err| {
            log::error!("Error changing model: {}", err);
            err
        })
    }

    async fn load_model(&mut self, variant: ModelVariant) -> Result<(), ModelLoadError> {
        self.loader.load(variant).await?;
        self.cycle.config.model_variant = variant;
        self.cycle.history.info(format!("{} model loaded", variant.display_name()));
        Ok(())
    }

    pub fn toggle_tracking(&mut self) -> bool {
        let enabled = !self.cycle.config.tracking_enabled;
        self.cycle.config.tracking_enabled = enabled;
        self.cycle.tracker.clear();
        self.cycle.history.info(format!("Object tracking {}", if enabled { "enabled" } else { "disabled" }));
        enabled
    }

    pub fn set_confidence(&mut self, threshold: f32) {
        if !threshold.is_finite() {
            log::warn!("Ignoring confidence threshold {}", threshold);
            return;
        }
        self.cycle.config.confidence_threshold = threshold.clamp(0., 1.);
        log::debug!("Confidence threshold {}%", (self.cycle.config.confidence_threshold * 100.).round());
    }

    /// Stores the resolution and applies it to an open source.
    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.cycle.config.resolution = resolution;
        if !self.camera_enabled {
            return;
        }
        match self.source.apply_constraints(resolution) {
            Ok(()) => self.cycle.history.info(format!("Resolution changed to {}", resolution)),
            Err(err) => log::error!("Error applying constraints: {}", err),
        }
    }

    pub fn clear_history(&mut self) {
        self.cycle.history.clear();
    }

    /// Saves the current frame with its overlays. `None` when the camera is off.
    ///
    /// A source torn down from outside (Ctrl-C) still leaves the last
    /// displayed frame to capture.
    pub fn capture(&mut self, out_dir: Option<PathBuf>) -> anyhow::Result<Option<PathBuf>> {
        if !self.camera_enabled {
            return Ok(None);
        }
        let frame: BvrImage = match self.cycle.last_frame.clone().or_else(|| self.source.frame()) {
            Some(frame) => frame,
            None => return Ok(None),
        };

        let elements = self.surface.elements();
        let path = match (&self.exporter, out_dir) {
            (_, Some(dir)) => SnapshotExporter::new(dir).export(&frame, &elements, Utc::now())?,
            (Some(exporter), None) => exporter.export(&frame, &elements, Utc::now())?,
            (None, None) => SnapshotExporter::new(FsAccess::captures_dir()?).export(&frame, &elements, Utc::now())?,
        };

        self.cycle.history.info("Image captured and downloaded");
        Ok(Some(path))
    }

    /// Tears down the capture source and removes every overlay.
    pub fn stop_camera(&mut self) {
        self.source.stop();
        self.cycle.renderer.clear(&mut self.surface);
        self.cycle.last_frame = None;
        self.camera_enabled = false;
        self.detection_loop.reset();
    }

    pub async fn apply(&mut self, command: ControlCommand) -> anyhow::Result<()> {
        log::debug!("Control: {:?}", command);
        match command {
            ControlCommand::SetConfidence(x) => self.set_confidence(x),
            ControlCommand::SetResolution(res) => self.set_resolution(res),
            ControlCommand::ChangeModel(variant) => self.change_model(variant).await?,
            ControlCommand::ToggleTracking => {
                self.toggle_tracking();
            }
            ControlCommand::ClearHistory => self.clear_history(),
            ControlCommand::Capture(dir) => {
                self.capture(dir)?;
            }
            ControlCommand::StopCamera => self.stop_camera(),
        }
        Ok(())
    }

    /// Applies every queued control command. Failures are logged, not returned.
    pub async fn drain_controls(&mut self) {
        let pending: Vec<ControlCommand> = match &self.controls {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };
        for command in pending {
            if let Err(err) = self.apply(command).await {
                log::error!("Control command failed: {:#}", err);
            }
        }
    }

    /// One detection cycle at `now` with the current model.
    pub async fn step(&mut self, now: Instant) -> CycleOutcome {
        if !self.camera_enabled {
            return CycleOutcome::Inactive;
        }
        let model = match self.loader.current() {
            Some(model) => model,
            None => return CycleOutcome::Inactive,
        };
        self.detection_loop
            .tick(&mut self.cycle, &*model, &mut self.source, &mut self.surface, now)
            .await
    }

    /// Drives the detection loop on the display refresh until the camera is
    /// stopped or `max_frames` frames have passed. Returns the frames run.
    pub async fn run(&mut self, max_frames: Option<u64>) -> u64 {
        let mut frames = 0;
        loop {
            if max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            self.detection_loop.next_frame().await;
            let now = Instant::now();
            self.cycle.stats.frame_tick(now);
            frames += 1;

            self.drain_controls().await;
            if let CycleOutcome::Inactive = self.step(now).await {
                log::info!("Live view stopped after {} frame(s)", frames);
                break;
            }
        }
        frames
    }
}
