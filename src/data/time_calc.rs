use std::time::{Duration, Instant};

/// Detection latency accumulator plus a once-per-second FPS counter.
#[derive(Debug, Default)]
pub struct TimeCalc {
    n: usize,
    total: Duration,
    last: Option<Duration>,
    fps: u32,
    frames_since_update: u32,
    last_fps_update: Option<Instant>,
}

impl TimeCalc {
    pub fn new() -> Self {
        Default::default()
    }

    /// Records one completed `detect` call.
    pub fn add_detection(&mut self, x: Duration) {
        self.total += x;
        self.last = Some(x);
        self.n += 1;
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn last(&self) -> Option<Duration> {
        self.last
    }

    /// Last detection latency in whole milliseconds, as displayed.
    pub fn last_ms(&self) -> Option<u128> {
        self.last.map(|d| (d.as_secs_f64() * 1000.).round() as u128)
    }

    pub fn avg(&self) -> Duration {
        if self.n == 0 {
            return Duration::ZERO;
        }
        self.total / self.n as u32
    }

    /// Counts one display frame. The rate is recomputed once at least a
    /// second has passed since the previous update.
    pub fn frame_tick(&mut self, now: Instant) -> u32 {
        self.frames_since_update += 1;
        let since = match self.last_fps_update {
            Some(t) => t,
            None => {
                self.last_fps_update = Some(now);
                return self.fps;
            }
        };
        let elapsed = now.saturating_duration_since(since);
        if elapsed >= Duration::from_secs(1) {
            let elapsed_ms = elapsed.as_secs_f64() * 1000.;
            self.fps = ((self.frames_since_update as f64 * 1000.) / elapsed_ms).round() as u32;
            self.frames_since_update = 0;
            self.last_fps_update = Some(now);
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn clear(&mut self) {
        *self = Default::default();
    }
}
