// src/cooldown.rs - Per-actor throw rate limiting

// Earliest game time at which an actor may throw again
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cooldown {
    ready_at: f64,
}

impl Cooldown {
    #[cfg(test)]
    pub fn ready_at(&self) -> f64 {
        self.ready_at
    }

    // The deadline itself still counts as cooling down.
    pub fn is_ready(&self, now: f64) -> bool {
        now > self.ready_at
    }

    pub fn armed(now: f64, duration: f64) -> Self {
        Self {
            ready_at: now + duration,
        }
    }

    pub fn remaining(&self, now: f64) -> f64 {
        (self.ready_at - now).max(0.0)
    }
}
