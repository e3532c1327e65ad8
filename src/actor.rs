// src/actor.rs - Who is playing and what each of them carries between frames
use crate::cooldown::Cooldown;
use crate::gesture::GestureReading;
use crate::match_state::Mode;
use nalgebra::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Player1,
    Player2,
    Ai,
}

impl Actor {
    pub const ALL: [Actor; 3] = [Actor::Player1, Actor::Player2, Actor::Ai];

    // The actor this one's fireballs can damage in the given mode.
    pub fn opponent(self, mode: Mode) -> Option<Actor> {
        match (mode, self) {
            (Mode::Single, Actor::Player1) => Some(Actor::Ai),
            (Mode::Single, Actor::Ai) => Some(Actor::Player1),
            (Mode::Single, Actor::Player2) => None,
            (Mode::TwoPlayer, Actor::Player1) => Some(Actor::Player2),
            (Mode::TwoPlayer, Actor::Player2) => Some(Actor::Player1),
            (Mode::TwoPlayer, Actor::Ai) => None,
        }
    }

    pub fn display_name(self, mode: Mode) -> &'static str {
        match (mode, self) {
            (Mode::Single, Actor::Player1) => "Player",
            (Mode::TwoPlayer, Actor::Player1) => "Player 1",
            (_, Actor::Player2) => "Player 2",
            (_, Actor::Ai) => "AI",
        }
    }

    // Throws must travel toward the opponent's half of the screen.
    pub fn throws_rightward(self) -> bool {
        match self {
            Actor::Player1 => true,
            Actor::Player2 | Actor::Ai => false,
        }
    }
}

// Gesture memory carried from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrowState {
    pub last_wrist_z: Option<f64>,
    pub cooldown: Cooldown,
}

#[derive(Debug, Clone)]
pub struct ActorState {
    pub health: u32,
    pub throw: ThrowState,
    // Absent while the actor is not detected.
    pub heart: Option<Point2<f64>>,
    pub reading: Option<GestureReading>,
}

impl ActorState {
    pub fn new(health: u32) -> Self {
        Self {
            health,
            throw: ThrowState::default(),
            heart: None,
            reading: None,
        }
    }

    // Called for frames where the landmark source saw nobody.
    pub fn lose_track(&mut self) {
        self.heart = None;
        self.reading = None;
        self.throw.last_wrist_z = None;
    }
}

pub struct Roster {
    player1: ActorState,
    player2: ActorState,
    ai: ActorState,
    default_health: u32,
}

impl Roster {
    pub fn new(default_health: u32) -> Self {
        Self {
            player1: ActorState::new(default_health),
            player2: ActorState::new(default_health),
            ai: ActorState::new(default_health),
            default_health,
        }
    }

    pub fn get(&self, actor: Actor) -> &ActorState {
        match actor {
            Actor::Player1 => &self.player1,
            Actor::Player2 => &self.player2,
            Actor::Ai => &self.ai,
        }
    }

    pub fn get_mut(&mut self, actor: Actor) -> &mut ActorState {
        match actor {
            Actor::Player1 => &mut self.player1,
            Actor::Player2 => &mut self.player2,
            Actor::Ai => &mut self.ai,
        }
    }

    // Takes one point of health and returns what is left.
    pub fn damage(&mut self, actor: Actor) -> u32 {
        let state = self.get_mut(actor);
        state.health = state.health.saturating_sub(1);
        state.health
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.default_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponents_follow_mode() {
        assert_eq!(Actor::Player1.opponent(Mode::Single), Some(Actor::Ai));
        assert_eq!(Actor::Ai.opponent(Mode::Single), Some(Actor::Player1));
        assert_eq!(Actor::Player1.opponent(Mode::TwoPlayer), Some(Actor::Player2));
        assert_eq!(Actor::Player2.opponent(Mode::TwoPlayer), Some(Actor::Player1));
        assert_eq!(Actor::Ai.opponent(Mode::TwoPlayer), None);
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut roster = Roster::new(1);
        assert_eq!(roster.damage(Actor::Ai), 0);
        assert_eq!(roster.damage(Actor::Ai), 0);
        assert_eq!(roster.get(Actor::Player1).health, 1);
    }

    #[test]
    fn reset_restores_every_actor() {
        let mut roster = Roster::new(3);
        roster.damage(Actor::Player2);
        roster.get_mut(Actor::Player1).throw.last_wrist_z = Some(0.2);
        roster.get_mut(Actor::Player1).heart = Some(Point2::new(1.0, 2.0));

        roster.reset();

        for actor in Actor::ALL {
            let state = roster.get(actor);
            assert_eq!(state.health, 3);
            assert_eq!(state.throw, ThrowState::default());
            assert!(state.heart.is_none());
        }
    }
}
