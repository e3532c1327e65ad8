// src/match_state.rs - Mode selection, pause, game over and reset
use crate::actor::Actor;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    TwoPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SelectingMode,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    mode: Option<Mode>,
    phase: Phase,
    winner: Option<Actor>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            mode: None,
            phase: Phase::SelectingMode,
            winner: None,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Actor> {
        self.winner
    }

    // True when nothing should move this frame.
    pub fn is_frozen(&self) -> bool {
        self.phase != Phase::Playing
    }

    fn invalid(&self, action: &'static str) -> MatchError {
        MatchError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }

    pub fn select_mode(&mut self, mode: Mode) -> Result<(), MatchError> {
        if self.phase != Phase::SelectingMode {
            return Err(self.invalid("select a mode"));
        }
        self.mode = Some(mode);
        self.phase = Phase::Playing;
        Ok(())
    }

    // Playing <-> Paused. Returns the new phase.
    pub fn toggle_pause(&mut self) -> Result<Phase, MatchError> {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            Phase::SelectingMode | Phase::GameOver => return Err(self.invalid("toggle pause")),
        };
        Ok(self.phase)
    }

    pub fn finish(&mut self, winner: Actor) -> Result<(), MatchError> {
        if self.phase != Phase::Playing {
            return Err(self.invalid("finish the match"));
        }
        self.phase = Phase::GameOver;
        self.winner = Some(winner);
        Ok(())
    }

    // Back to Playing under the mode chosen at startup.
    pub fn reset(&mut self) -> Result<(), MatchError> {
        if self.phase != Phase::GameOver {
            return Err(self.invalid("reset"));
        }
        self.phase = Phase::Playing;
        self.winner = None;
        Ok(())
    }
}
