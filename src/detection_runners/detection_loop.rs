use std::time::{Duration, Instant};
use chrono::Local;
use tokio::time::{Interval, MissedTickBehavior};
use crate::common::{filter_by_threshold, BvrImage, DetectionCycleError};
use crate::data::{DetectionConfig, HistoryLog, TimeCalc};
use crate::detection_runners::{CaptureSource, DetectionModel};
use crate::overlay::{OverlayRenderer, OverlaySurface, RenderSummary, Tracker};
use crate::utils;

/// Display refresh the loop reschedules on, roughly 60 Hz.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(16);

/// Everything a detection cycle reads or mutates, passed in explicitly.
#[derive(Debug, Default)]
pub struct CycleState {
    pub config: DetectionConfig,
    pub renderer: OverlayRenderer,
    pub tracker: Tracker,
    pub history: HistoryLog,
    pub stats: TimeCalc,
    /// Frame the displayed overlays were computed from.
    pub last_frame: Option<BvrImage>,
}

impl CycleState {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    #[default] Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The capture source is gone; the loop stops.
    Inactive,
    /// Not due yet; `detect` was not invoked.
    Throttled,
    Detected { summary: RenderSummary, latency: Duration },
    /// `detect` failed or no frame was available. The loop carries on.
    Failed(String),
    /// The source was stopped or reopened while `detect` was pending.
    Discarded,
}

#[derive(Debug)]
pub struct DetectionLoop {
    state: LoopState,
    last_detection: Option<Instant>,
    refresh_interval: Duration,
    frames: Option<Interval>,
    detect_calls: u64,
}

impl Default for DetectionLoop {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl DetectionLoop {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            state: LoopState::Idle,
            last_detection: None,
            refresh_interval,
            frames: None,
            detect_calls: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Total `detect` invocations so far.
    pub fn detect_calls(&self) -> u64 {
        self.detect_calls
    }

    /// Forgets the throttle window so the next cycle detects immediately.
    pub fn reset(&mut self) {
        self.last_detection = None;
        self.state = LoopState::Idle;
    }

    /// Waits for the next display frame.
    pub async fn next_frame(&mut self) {
        let refresh = self.refresh_interval;
        let frames = self.frames.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(refresh);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        frames.tick().await;
    }

    /// Runs one cycle at time `now`.
    ///
    /// Only a due cycle invokes `detect`, and it is awaited before returning,
    /// so at most one call is ever in flight.
    pub async fn tick<M, S, O>(&mut self, cycle: &mut CycleState, model: &M,
                               source: &mut S, surface: &mut O, now: Instant) -> CycleOutcome
    where
        M: DetectionModel,
        S: CaptureSource,
        O: OverlaySurface,
    {
        if !source.is_active() {
            if self.state == LoopState::Running {
                log::info!("Capture source torn down, detection loop idle");
            }
            self.state = LoopState::Idle;
            return CycleOutcome::Inactive;
        }
        self.state = LoopState::Running;

        if let Some(last) = self.last_detection {
            if now.saturating_duration_since(last) < cycle.config.min_detection_interval() {
                return CycleOutcome::Throttled;
            }
        }
        self.last_detection = Some(now);

        let generation = source.generation();
        let frame = match source.frame() {
            Some(frame) => frame,
            None => {
                let err = DetectionCycleError::NoFrame;
                log::error!("Detection error: {}", err);
                return CycleOutcome::Failed(err.to_string());
            }
        };

        let started = Instant::now();
        self.detect_calls += 1;
        let result = model.detect(&frame).await;
        let latency = utils::trace("TIME", "Detection run", started);

        if !source.is_active() || source.generation() != generation {
            log::debug!("Dropping detection result for frame {} from a stale capture source", frame.frame_index);
            return CycleOutcome::Discarded;
        }

        let predictions = match result {
            Ok(predictions) => predictions,
            Err(err) => {
                let err = DetectionCycleError::Detect(err);
                log::error!("Detection error: {}", err);
                return CycleOutcome::Failed(err.to_string());
            }
        };
        cycle.stats.add_detection(latency);

        let batch = filter_by_threshold(predictions, cycle.config.confidence_threshold);
        let tracker = if cycle.config.tracking_enabled { Some(&mut cycle.tracker) } else { None };
        let summary = cycle.renderer.render(surface, &batch, tracker, now);

        if !summary.counts.is_empty() {
            let timestamp = Local::now().format("%H:%M:%S");
            cycle.history.info(format!("Detected: {} at {}", summary.objects_list(), timestamp));
        }

        log::trace!("Frame {}: {} object(s) in {:.2?}", frame.frame_index, summary.object_count(), latency);
        cycle.last_frame = Some(frame);
        CycleOutcome::Detected { summary, latency }
    }

    /// Reschedules on every display frame until the capture source is torn
    /// down or `max_cycles` frames have passed. Returns the frames processed.
    pub async fn run<M, S, O>(&mut self, cycle: &mut CycleState, model: &M, source: &mut S,
                              surface: &mut O, max_cycles: Option<u64>) -> u64
    where
        M: DetectionModel,
        S: CaptureSource,
        O: OverlaySurface,
    {
        let mut frames = 0;
        loop {
            if max_cycles.is_some_and(|max| frames >= max) {
                break;
            }
            self.next_frame().await;
            let now = Instant::now();
            cycle.stats.frame_tick(now);
            frames += 1;
            if let CycleOutcome::Inactive = self.tick(cycle, model, source, surface, now).await {
                break;
            }
        }
        frames
    }
}
