// src/ai.rs - Single-player opponent: swaying heart, jittered fire rate
use crate::actor::Actor;
use crate::config::GameConfig;
use crate::cooldown::Cooldown;
use crate::gesture::SpawnRequest;
use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    // A fixed seed replays the same AI timing every match
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.rng.gen_range(min..=max)
    }
}

pub struct AiController {
    base: Point2<f64>,
    phase: f64,
    heart: Point2<f64>,
    cooldown: Cooldown,
    rng: Box<dyn RandomSource>,
    animation_speed: f64,
    animation_range: f64,
    min_cooldown: f64,
    max_cooldown: f64,
    muzzle_offset: f64,
}

impl AiController {
    // The AI stands `ai_edge_inset` pixels from the right edge, halfway down.
    pub fn new(config: &GameConfig, width: f64, height: f64, rng: Box<dyn RandomSource>) -> Self {
        let base = Point2::new(width - config.ai_edge_inset, height / 2.0);
        Self {
            base,
            phase: 0.0,
            heart: base,
            cooldown: Cooldown::default(),
            rng,
            animation_speed: config.ai_animation_speed,
            animation_range: config.ai_animation_range,
            min_cooldown: config.ai_min_cooldown,
            max_cooldown: config.ai_max_cooldown,
            muzzle_offset: config.ai_muzzle_offset,
        }
    }

    #[cfg(test)]
    pub fn heart(&self) -> Point2<f64> {
        self.heart
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    // Advances the vertical sway by one frame. Purely visual, but hits are
    // tested against wherever the heart ends up.
    pub fn animate(&mut self) -> Point2<f64> {
        self.phase += self.animation_speed;
        self.heart = self.base + Vector2::new(0.0, self.phase.sin() * self.animation_range);
        self.heart
    }

    // Fires at `target` once the cooldown has run out, then re-rolls it.
    pub fn try_fire(&mut self, now: f64, target: Point2<f64>) -> Option<SpawnRequest> {
        if !self.cooldown.is_ready(now) {
            return None;
        }
        let wait = self.rng.uniform(self.min_cooldown, self.max_cooldown);
        self.cooldown = Cooldown::armed(now, wait);
        tracing::debug!(wait, "AI fires");

        Some(SpawnRequest {
            owner: Actor::Ai,
            origin: Point2::new(self.heart.x - self.muzzle_offset, self.heart.y),
            target,
        })
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.heart = self.base;
        self.cooldown = Cooldown::default();
    }
}
