use std::time::{Duration, Instant};

/// Logs the time spent in `l_step` since `started` and returns it.
pub(crate) fn trace(l_type: &str, l_step: &str, started: Instant) -> Duration {
    let elapsed = started.elapsed();
    log::trace!("{} | {}={:.2?}", l_type, l_step, elapsed);
    elapsed
}
