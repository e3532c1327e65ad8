// src/combat.rs - Fireball vs heart collisions and health bookkeeping
use crate::actor::{Actor, Roster};
use crate::fireball::{Fireball, ProjectileSimulator};
use crate::match_state::Mode;
use nalgebra::Point2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    // Index into the simulator's fireball list at scan time.
    pub fireball: usize,
    pub owner: Actor,
    pub target: Actor,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatOutcome {
    pub hits: Vec<Hit>,
    pub winner: Option<Actor>,
}

pub struct CollisionEngine {
    heart_radius: f64,
    fireball_radius: f64,
}

impl CollisionEngine {
    pub fn new(heart_radius: f64, fireball_radius: f64) -> Self {
        Self {
            heart_radius,
            fireball_radius,
        }
    }

    pub fn overlaps(&self, fireball: &Point2<f64>, heart: &Point2<f64>) -> bool {
        nalgebra::distance(fireball, heart) < self.heart_radius + self.fireball_radius
    }

    // First phase: find every fireball touching the heart it is aimed at.
    // Nothing is mutated here.
    pub fn scan(&self, fireballs: &[Fireball], mode: Mode, roster: &Roster) -> Vec<Hit> {
        if mode == Mode::TwoPlayer
            && (roster.get(Actor::Player1).heart.is_none() || roster.get(Actor::Player2).heart.is_none())
        {
            return Vec::new();
        }

        fireballs
            .iter()
            .enumerate()
            .filter(|(_, fireball)| !fireball.is_hit())
            .filter_map(|(index, fireball)| {
                let target = fireball.owner.opponent(mode)?;
                let heart = roster.get(target).heart?;
                self.overlaps(&fireball.position, &heart).then_some(Hit {
                    fireball: index,
                    owner: fireball.owner,
                    target,
                })
            })
            .collect()
    }

    // Second phase: retire the hit fireballs and apply damage. Damage stops
    // as soon as someone runs out of health.
    pub fn resolve(
        &self,
        projectiles: &mut ProjectileSimulator,
        roster: &mut Roster,
        mode: Mode,
    ) -> CombatOutcome {
        let hits = self.scan(projectiles.fireballs(), mode, roster);
        if hits.is_empty() {
            return CombatOutcome::default();
        }

        let indices: Vec<usize> = hits.iter().map(|hit| hit.fireball).collect();
        projectiles.retire_hits(&indices);

        let mut applied = Vec::with_capacity(hits.len());
        let mut winner = None;
        for hit in hits {
            let remaining = roster.damage(hit.target);
            tracing::info!(target_actor = ?hit.target, remaining, "heart hit");
            applied.push(hit);
            if remaining == 0 {
                winner = hit.target.opponent(mode);
                break;
            }
        }

        CombatOutcome {
            hits: applied,
            winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::SpawnRequest;

    const HEART: f64 = 15.0;
    const BALL: f64 = 50.0;

    fn engine() -> CollisionEngine {
        CollisionEngine::new(HEART, BALL)
    }

    fn fire(sim: &mut ProjectileSimulator, owner: Actor, at: (f64, f64)) {
        sim.spawn(&SpawnRequest {
            owner,
            origin: Point2::new(at.0, at.1),
            target: Point2::new(at.0 + 1.0, at.1),
        });
    }

    fn single_player_roster(health: u32) -> Roster {
        let mut roster = Roster::new(health);
        roster.get_mut(Actor::Player1).heart = Some(Point2::new(200.0, 300.0));
        roster.get_mut(Actor::Ai).heart = Some(Point2::new(540.0, 240.0));
        roster
    }

    #[test]
    fn near_miss_boundary() {
        let e = engine();
        let heart = Point2::new(0.0, 0.0);
        assert!(e.overlaps(&Point2::new(HEART + BALL - 1.0, 0.0), &heart));
        assert!(!e.overlaps(&Point2::new(HEART + BALL, 0.0), &heart));
    }

    #[test]
    fn ai_hit_at_just_inside_range_takes_one_health() {
        let mut roster = single_player_roster(2);
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Ai, (200.0 + HEART + BALL - 1.0, 300.0));

        let outcome = engine().resolve(&mut sim, &mut roster, Mode::Single);

        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].target, Actor::Player1);
        assert_eq!(outcome.winner, None);
        assert_eq!(roster.get(Actor::Player1).health, 1);
        assert!(sim.is_empty());
    }

    #[test]
    fn last_health_point_names_the_opponent() {
        let mut roster = single_player_roster(1);
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Ai, (210.0, 300.0));

        let outcome = engine().resolve(&mut sim, &mut roster, Mode::Single);

        assert_eq!(roster.get(Actor::Player1).health, 0);
        assert_eq!(outcome.winner, Some(Actor::Ai));
    }

    #[test]
    fn own_fireball_does_not_hurt() {
        let mut roster = single_player_roster(2);
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Player1, (200.0, 300.0));

        let outcome = engine().resolve(&mut sim, &mut roster, Mode::Single);
        assert!(outcome.hits.is_empty());
        assert_eq!(sim.len(), 1);
        assert_eq!(roster.get(Actor::Player1).health, 2);
    }

    #[test]
    fn player_fireball_hits_ai() {
        let mut roster = single_player_roster(2);
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Player1, (530.0, 250.0));

        engine().resolve(&mut sim, &mut roster, Mode::Single);
        assert_eq!(roster.get(Actor::Ai).health, 1);
    }

    #[test]
    fn a_fireball_damages_only_once() {
        let mut roster = single_player_roster(5);
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Ai, (200.0, 300.0));
        let e = engine();

        e.resolve(&mut sim, &mut roster, Mode::Single);
        e.resolve(&mut sim, &mut roster, Mode::Single);
        e.resolve(&mut sim, &mut roster, Mode::Single);

        assert_eq!(roster.get(Actor::Player1).health, 4);
    }

    #[test]
    fn already_hit_fireballs_are_skipped_by_scan() {
        let roster = single_player_roster(2);
        let mut ball = Fireball::launch(Actor::Ai, Point2::new(200.0, 300.0), Point2::new(0.0, 300.0), 50.0);
        ball.mark_hit();
        assert!(engine().scan(&[ball], Mode::Single, &roster).is_empty());
    }

    #[test]
    fn damage_stops_at_game_over() {
        let mut roster = single_player_roster(1);
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Ai, (200.0, 300.0));
        fire(&mut sim, Actor::Ai, (205.0, 300.0));
        fire(&mut sim, Actor::Player1, (540.0, 240.0));

        let outcome = engine().resolve(&mut sim, &mut roster, Mode::Single);

        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.winner, Some(Actor::Ai));
        assert_eq!(roster.get(Actor::Player1).health, 0);
        assert_eq!(roster.get(Actor::Ai).health, 1);
        // Every overlapping fireball is consumed even if its damage was not applied
        assert!(sim.is_empty());
    }

    #[test]
    fn single_player_without_human_heart_skips_ai_fireballs() {
        let mut roster = single_player_roster(2);
        roster.get_mut(Actor::Player1).heart = None;
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Ai, (200.0, 300.0));

        assert!(engine().scan(sim.fireballs(), Mode::Single, &roster).is_empty());
    }

    #[test]
    fn two_player_routing() {
        let mut roster = Roster::new(2);
        roster.get_mut(Actor::Player1).heart = Some(Point2::new(160.0, 240.0));
        roster.get_mut(Actor::Player2).heart = Some(Point2::new(480.0, 240.0));
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Player1, (470.0, 240.0));
        fire(&mut sim, Actor::Player2, (170.0, 240.0));
        fire(&mut sim, Actor::Player1, (160.0, 240.0));

        let outcome = engine().resolve(&mut sim, &mut roster, Mode::TwoPlayer);

        assert_eq!(outcome.hits.len(), 2);
        assert_eq!(roster.get(Actor::Player1).health, 1);
        assert_eq!(roster.get(Actor::Player2).health, 1);
        assert_eq!(sim.len(), 1);
        assert_eq!(sim.fireballs()[0].owner, Actor::Player1);
    }

    #[test]
    fn two_player_needs_both_hearts() {
        let mut roster = Roster::new(2);
        roster.get_mut(Actor::Player1).heart = Some(Point2::new(160.0, 240.0));
        let mut sim = ProjectileSimulator::new(50.0);
        fire(&mut sim, Actor::Player2, (160.0, 240.0));

        let outcome = engine().resolve(&mut sim, &mut roster, Mode::TwoPlayer);
        assert!(outcome.hits.is_empty());
        assert_eq!(roster.get(Actor::Player1).health, 2);
    }
}
