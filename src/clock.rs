// src/clock.rs
use std::time::Instant;

pub trait Clock {
    // Seconds since some fixed origin.
    fn now(&self) -> f64;
}

// Monotonic seconds since the clock was created.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

// Tracks how much wall time the match spent frozen so cooldown deadlines
// only count down while playing.
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    frozen_total: f64,
    frozen_since: Option<f64>,
}

impl GameTime {
    pub fn freeze(&mut self, now: f64) {
        if self.frozen_since.is_none() {
            self.frozen_since = Some(now);
        }
    }

    pub fn thaw(&mut self, now: f64) {
        if let Some(since) = self.frozen_since.take() {
            self.frozen_total += (now - since).max(0.0);
        }
    }

    pub fn at(&self, now: f64) -> f64 {
        let pending = self.frozen_since.map_or(0.0, |since| (now - since).max(0.0));
        now - self.frozen_total - pending
    }
}
