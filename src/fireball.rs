// src/fireball.rs - In-flight fireballs and their per-frame motion
use crate::actor::Actor;
use crate::gesture::{unit_or_up, SpawnRequest};
use nalgebra::{Point2, Vector2};
use std::collections::VecDeque;

pub const TRAIL_LENGTH: usize = 10;

#[derive(Debug, Clone)]
pub struct Fireball {
    pub owner: Actor,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    hit: bool,
    trail: VecDeque<Point2<f64>>,
}

impl Fireball {
    // Heads from `origin` toward `target` at `speed` pixels per frame.
    pub fn launch(owner: Actor, origin: Point2<f64>, target: Point2<f64>, speed: f64) -> Self {
        let heading = unit_or_up(&(target - origin));
        Self {
            owner,
            position: origin,
            velocity: heading * speed,
            hit: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    // One-way latch; there is no way to clear it.
    pub fn mark_hit(&mut self) {
        self.hit = true;
    }

    // Oldest first.
    pub fn trail(&self) -> impl Iterator<Item = &Point2<f64>> {
        self.trail.iter()
    }

    pub fn advance(&mut self) {
        self.trail.push_back(self.position);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
        self.position += self.velocity;
    }
}

// Owns every fireball currently on screen.
pub struct ProjectileSimulator {
    fireballs: Vec<Fireball>,
    speed: f64,
}

impl ProjectileSimulator {
    pub fn new(speed: f64) -> Self {
        Self {
            fireballs: Vec::new(),
            speed,
        }
    }

    pub fn spawn(&mut self, request: &SpawnRequest) {
        self.fireballs.push(Fireball::launch(
            request.owner,
            request.origin,
            request.target,
            self.speed,
        ));
    }

    pub fn fireballs(&self) -> &[Fireball] {
        &self.fireballs
    }

    pub fn len(&self) -> usize {
        self.fireballs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fireballs.is_empty()
    }

    // Latches the hit flag on the given fireballs and drops them.
    pub fn retire_hits(&mut self, indices: &[usize]) {
        for &index in indices {
            if let Some(fireball) = self.fireballs.get_mut(index) {
                fireball.mark_hit();
            }
        }
        self.fireballs.retain(|fireball| !fireball.is_hit());
    }

    // Moves everything one frame and returns how many left the playfield.
    pub fn tick(&mut self, width: f64, height: f64) -> usize {
        for fireball in &mut self.fireballs {
            fireball.advance();
        }
        let before = self.fireballs.len();
        self.fireballs.retain(|fireball| {
            let p = fireball.position;
            0.0 < p.x && p.x < width && 0.0 < p.y && p.y < height
        });
        before - self.fireballs.len()
    }

    pub fn clear(&mut self) {
        self.fireballs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(origin: (f64, f64), target: (f64, f64)) -> SpawnRequest {
        SpawnRequest {
            owner: Actor::Player1,
            origin: Point2::new(origin.0, origin.1),
            target: Point2::new(target.0, target.1),
        }
    }

    #[test]
    fn launch_renormalizes_to_speed() {
        let fireball = Fireball::launch(
            Actor::Ai,
            Point2::new(100.0, 100.0),
            Point2::new(100.0 + 3000.0, 100.0 + 4000.0),
            50.0,
        );
        assert!((fireball.velocity.norm() - 50.0).abs() < 1e-9);
        assert!((fireball.velocity.x - 30.0).abs() < 1e-9);
        assert!((fireball.velocity.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn launch_onto_origin_goes_up() {
        let p = Point2::new(10.0, 10.0);
        let fireball = Fireball::launch(Actor::Player2, p, p, 50.0);
        assert_eq!(fireball.velocity, Vector2::new(0.0, -50.0));
    }

    #[test]
    fn trail_keeps_last_ten_positions() {
        let mut fireball = Fireball::launch(
            Actor::Player1,
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            1.0,
        );
        for _ in 0..15 {
            fireball.advance();
        }
        let xs: Vec<f64> = fireball.trail().map(|p| p.x).collect();
        assert_eq!(xs.len(), TRAIL_LENGTH);
        assert_eq!(xs.first(), Some(&5.0));
        assert_eq!(xs.last(), Some(&14.0));
        assert_eq!(fireball.position.x, 15.0);
    }

    #[test]
    fn tick_moves_then_culls() {
        let mut sim = ProjectileSimulator::new(50.0);
        sim.spawn(&request((320.0, 240.0), (640.0, 240.0)));
        sim.spawn(&request((620.0, 240.0), (700.0, 240.0)));

        assert_eq!(sim.tick(640.0, 480.0), 1);
        assert_eq!(sim.len(), 1);
        assert_eq!(sim.fireballs()[0].position, Point2::new(370.0, 240.0));
    }

    #[test]
    fn edge_fireball_moving_out_is_removed_next_tick() {
        let mut sim = ProjectileSimulator::new(50.0);
        sim.spawn(&request((639.0, 5.0), (639.0, -100.0)));
        assert_eq!(sim.len(), 1);
        sim.tick(640.0, 480.0);
        assert!(sim.is_empty());
    }

    #[test]
    fn landing_exactly_on_border_is_out() {
        let mut sim = ProjectileSimulator::new(40.0);
        sim.spawn(&request((600.0, 240.0), (700.0, 240.0)));
        sim.tick(640.0, 480.0);
        assert!(sim.is_empty());
    }

    #[test]
    fn retired_hits_are_removed() {
        let mut sim = ProjectileSimulator::new(50.0);
        sim.spawn(&request((100.0, 100.0), (200.0, 100.0)));
        sim.spawn(&request((200.0, 100.0), (300.0, 100.0)));
        sim.retire_hits(&[0]);
        assert_eq!(sim.len(), 1);
        assert_eq!(sim.fireballs()[0].position.x, 200.0);
        assert!(!sim.fireballs()[0].is_hit());
    }
}
