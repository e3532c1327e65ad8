// src/game.rs - One frame of the fireball duel: gestures, AI, hits, motion
use crate::actor::{Actor, ActorState, Roster};
use crate::ai::{AiController, RandomSource};
use crate::audio::{AudioCue, MusicCommand};
use crate::clock::GameTime;
use crate::combat::{CollisionEngine, Hit};
use crate::config::GameConfig;
use crate::fireball::{Fireball, ProjectileSimulator};
use crate::gesture::{GestureClassifier, GestureReading, Viewport};
use crate::landmarks::LandmarkFrame;
use crate::match_state::{MatchError, MatchState, Mode, Phase};
use nalgebra::Point2;
use tracing::{debug, info};

// What the pose model saw this frame. Single-player only uses `player1`.
#[derive(Debug, Clone, Default)]
pub struct FrameLandmarks {
    pub player1: Option<LandmarkFrame>,
    pub player2: Option<LandmarkFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    SelectMode(Mode),
    TogglePause,
    Reset,
}

// Events produced by one `step`, for the audio and telemetry layers.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub cues: Vec<AudioCue>,
    pub spawned: Vec<Actor>,
    pub hits: Vec<Hit>,
    pub culled: usize,
}

// Axis-aligned rectangle a two-player contestant should stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl PlayArea {
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        self.min.x < p.x && p.x < self.max.x && self.min.y < p.y && p.y < self.max.y
    }
}

pub struct Game {
    width: f64,
    height: f64,
    margin: f64,
    heart_radius: f64,
    fireball_radius: f64,
    state: MatchState,
    roster: Roster,
    classifier: GestureClassifier,
    collisions: CollisionEngine,
    projectiles: ProjectileSimulator,
    ai: AiController,
    time: GameTime,
}

impl Game {
    pub fn new(config: &GameConfig, width: f64, height: f64, rng: Box<dyn RandomSource>) -> Self {
        Self {
            width,
            height,
            margin: config.playable_area_margin,
            heart_radius: config.heart_radius,
            fireball_radius: config.fireball_radius,
            state: MatchState::new(),
            roster: Roster::new(config.default_health),
            classifier: GestureClassifier::new(config.gesture.clone(), config.player_cooldown),
            collisions: CollisionEngine::new(config.heart_radius, config.fireball_radius),
            projectiles: ProjectileSimulator::new(config.fireball_speed),
            ai: AiController::new(config, width, height, rng),
            time: GameTime::default(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn heart_radius(&self) -> f64 {
        self.heart_radius
    }

    pub fn fireball_radius(&self) -> f64 {
        self.fireball_radius
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.state.mode()
    }

    pub fn winner(&self) -> Option<Actor> {
        self.state.winner()
    }

    pub fn actor(&self, actor: Actor) -> &ActorState {
        self.roster.get(actor)
    }

    pub fn reading(&self, actor: Actor) -> Option<&GestureReading> {
        self.roster.get(actor).reading.as_ref()
    }

    // Seconds of game time before `actor` may throw again.
    pub fn cooldown_remaining(&self, actor: Actor, now: f64) -> f64 {
        let t = self.time.at(now);
        match actor {
            Actor::Ai => self.ai.cooldown().remaining(t),
            Actor::Player1 | Actor::Player2 => self.roster.get(actor).throw.cooldown.remaining(t),
        }
    }

    pub fn fireballs(&self) -> &[Fireball] {
        self.projectiles.fireballs()
    }

    // Where the right half starts in split screen; integer pixel boundary
    pub fn split_x(&self) -> f64 {
        (self.width / 2.0).floor()
    }

    fn viewport(&self, actor: Actor, mode: Mode) -> Viewport {
        match (mode, actor) {
            (Mode::Single, _) => Viewport::full(self.width, self.height),
            (Mode::TwoPlayer, Actor::Player1) => Viewport {
                width: self.split_x(),
                height: self.height,
                offset_x: 0.0,
            },
            (Mode::TwoPlayer, Actor::Player2) => Viewport {
                width: self.split_x(),
                height: self.height,
                offset_x: self.split_x(),
            },
            // The AI never reads landmarks; keep it on the whole frame
            (Mode::TwoPlayer, Actor::Ai) => Viewport::full(self.width, self.height),
        }
    }

    // Dashed boundary for each side in two-player mode.
    pub fn play_area(&self, actor: Actor) -> Option<PlayArea> {
        if self.mode() != Some(Mode::TwoPlayer) {
            return None;
        }
        let mid = self.split_x();
        let m = self.margin;
        match actor {
            Actor::Player1 => Some(PlayArea {
                min: Point2::new(m, m),
                max: Point2::new(mid - m, self.height - m),
            }),
            Actor::Player2 => Some(PlayArea {
                min: Point2::new(mid + m, m),
                max: Point2::new(self.width - m, self.height - m),
            }),
            Actor::Ai => None,
        }
    }

    // A detected player whose heart has drifted outside their dashed area.
    pub fn out_of_bounds(&self, actor: Actor) -> bool {
        match (self.play_area(actor), self.roster.get(actor).heart) {
            (Some(area), Some(heart)) => !area.contains(&heart),
            _ => false,
        }
    }

    pub fn handle_input(&mut self, input: GameInput, now: f64) -> Result<Option<MusicCommand>, MatchError> {
        match input {
            GameInput::SelectMode(mode) => {
                self.state.select_mode(mode)?;
                info!(?mode, "match started");
                Ok(Some(MusicCommand::Play))
            }
            GameInput::TogglePause => match self.state.toggle_pause()? {
                Phase::Paused => {
                    self.time.freeze(now);
                    Ok(Some(MusicCommand::Pause))
                }
                _ => {
                    self.time.thaw(now);
                    Ok(Some(MusicCommand::Resume))
                }
            },
            GameInput::Reset => {
                self.state.reset()?;
                self.roster.reset();
                self.projectiles.clear();
                self.ai.reset();
                self.time.thaw(now);
                info!("match reset");
                Ok(None)
            }
        }
    }

    // Runs one frame. Does nothing unless the match is being played.
    pub fn step(&mut self, landmarks: &FrameLandmarks, now: f64) -> FrameReport {
        let mut report = FrameReport::default();
        if self.state.is_frozen() {
            return report;
        }
        let Some(mode) = self.state.mode() else {
            return report;
        };
        let t = self.time.at(now);

        match mode {
            Mode::Single => {
                let ai_heart = self.ai.animate();
                self.roster.get_mut(Actor::Ai).heart = Some(ai_heart);

                self.observe(Actor::Player1, landmarks.player1.as_ref(), mode, t, &mut report);

                let player_heart = self.roster.get(Actor::Player1).heart;
                if let Some(player_heart) = player_heart {
                    if let Some(shot) = self.ai.try_fire(t, player_heart) {
                        self.projectiles.spawn(&shot);
                        report.spawned.push(Actor::Ai);
                        report.cues.push(AudioCue::throw_by(Actor::Ai));
                    }
                    self.resolve_hits(mode, now, &mut report);
                }
            }
            Mode::TwoPlayer => {
                self.observe(Actor::Player1, landmarks.player1.as_ref(), mode, t, &mut report);
                self.observe(Actor::Player2, landmarks.player2.as_ref(), mode, t, &mut report);
                self.resolve_hits(mode, now, &mut report);
            }
        }

        if !self.state.is_frozen() && !self.projectiles.is_empty() {
            report.culled = self.projectiles.tick(self.width, self.height);
            if report.culled > 0 {
                debug!(culled = report.culled, in_flight = self.projectiles.len(), "fireballs left the arena");
            }
        }
        report
    }

    fn observe(
        &mut self,
        actor: Actor,
        frame: Option<&LandmarkFrame>,
        mode: Mode,
        t: f64,
        report: &mut FrameReport,
    ) {
        let Some(frame) = frame else {
            self.roster.get_mut(actor).lose_track();
            return;
        };

        let viewport = self.viewport(actor, mode);
        let state = self.roster.get_mut(actor);
        state.heart = Some(self.classifier.heart_position(frame, &viewport));

        let decision = self.classifier.classify(actor, frame, &viewport, state.throw, t);
        state.throw = decision.state;
        state.reading = Some(decision.reading);

        if let Some(spawn) = decision.spawn {
            self.projectiles.spawn(&spawn);
            report.spawned.push(actor);
            report.cues.push(AudioCue::throw_by(actor));
        }
    }

    fn resolve_hits(&mut self, mode: Mode, now: f64, report: &mut FrameReport) {
        let outcome = self
            .collisions
            .resolve(&mut self.projectiles, &mut self.roster, mode);
        report.cues.extend(outcome.hits.iter().map(|_| AudioCue::Hit));
        report.hits.extend(outcome.hits);

        if let Some(winner) = outcome.winner {
            match self.state.finish(winner) {
                Ok(()) => {
                    self.time.freeze(now);
                    report.cues.push(AudioCue::Win);
                    info!(winner = winner.display_name(mode), "game over");
                }
                Err(e) => debug!("ignoring win: {}", e),
            }
        }
    }
}
