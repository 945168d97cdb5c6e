use instant::Instant;
use std::time::Duration;

/// Frame-delta clock: each call to [`FrameClock::tick`] returns the time
/// since the previous call.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Instant,
    max_delta: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_delta(Duration::from_millis(250))
    }

    /// Deltas longer than `max_delta` (window drags, debugger stops) are
    /// clamped so the phase never leaps.
    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            last: Instant::now(),
            max_delta,
        }
    }

    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        dt.min(self.max_delta)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
