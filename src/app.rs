// src/app.rs
use crate::actor::Actor;
use crate::ai::StdRandom;
use crate::audio::{AudioSink, LogAudio, MusicCommand};
use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;
use crate::game::{FrameLandmarks, Game, GameInput};
use crate::landmarks::{Facing, LandmarkFrame, LandmarkSource, SimulatedPose};
use crate::match_state::{Mode, Phase};
use crate::telemetry::SessionRecorder;
use crate::ui::{ArenaRenderer, ArenaTransform, VideoWidget};
use crate::video::{self, VideoSource};

use eframe::egui;
use image::DynamicImage;

pub struct FireballApp {
    // Core components
    camera: VideoSource,
    clock: Box<dyn Clock>,
    game: Game,
    player1_pose: Box<dyn LandmarkSource>,
    player2_pose: Box<dyn LandmarkSource>,
    audio: Box<dyn AudioSink>,
    recorder: Option<SessionRecorder>,
    zoom: f64,

    // UI Components
    video_widget: VideoWidget,
    renderer: ArenaRenderer,
    camera_error: Option<String>,
    shut_down: bool,
}

impl FireballApp {
    // `first_frame` fixes the arena size for the whole session.
    pub fn new(config: GameConfig, camera: VideoSource, first_frame: &DynamicImage) -> Self {
        let zoom = config.camera_zoom;
        let arena = video::zoom(first_frame, zoom);
        let game = Game::new(
            &config,
            arena.width() as f64,
            arena.height() as f64,
            Box::new(StdRandom::from_seed(config.ai_seed)),
        );

        tracing::warn!("No native pose model linked; using simulated players");
        let recorder = config
            .record_gestures
            .then(|| SessionRecorder::new(&config.output_directory, None));

        Self {
            camera,
            clock: Box::new(SystemClock::new()),
            game,
            player1_pose: Box::new(SimulatedPose::new(Facing::Right)),
            player2_pose: Box::new(SimulatedPose::new(Facing::Left)),
            audio: Box::new(LogAudio::default()),
            recorder,
            zoom,
            video_widget: VideoWidget::new(),
            renderer: ArenaRenderer::new(),
            camera_error: None,
            shut_down: false,
        }
    }

    fn apply(&mut self, input: GameInput) {
        match self.game.handle_input(input, self.clock.now()) {
            Ok(Some(command)) => self.audio.music(command),
            Ok(None) => {}
            Err(e) => tracing::trace!("ignoring {:?}: {}", input, e),
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) -> bool {
        let (pause, reset, quit) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::Q),
            )
        });
        if pause {
            self.apply(GameInput::TogglePause);
        }
        if reset {
            self.apply(GameInput::Reset);
        }
        quit
    }

    fn infer(source: &mut dyn LandmarkSource, image: &DynamicImage, actor: Actor) -> Option<LandmarkFrame> {
        match source.infer(image) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(?actor, "Pose inference failed: {:#}", e);
                None
            }
        }
    }

    fn detect(&mut self, frame: &DynamicImage) -> FrameLandmarks {
        match self.game.mode() {
            Some(Mode::Single) => FrameLandmarks {
                player1: Self::infer(self.player1_pose.as_mut(), frame, Actor::Player1),
                player2: None,
            },
            Some(Mode::TwoPlayer) => {
                let (left, right) = video::split_halves(frame);
                FrameLandmarks {
                    player1: Self::infer(self.player1_pose.as_mut(), &left, Actor::Player1),
                    player2: Self::infer(self.player2_pose.as_mut(), &right, Actor::Player2),
                }
            }
            None => FrameLandmarks::default(),
        }
    }

    // One pass of the frame loop: capture, detect, simulate.
    fn tick(&mut self, ctx: &egui::Context) {
        let frame = match self.camera.read_frame() {
            Ok(frame) => {
                self.camera_error = None;
                video::zoom(&frame, self.zoom)
            }
            Err(e) => {
                if self.camera_error.is_none() {
                    tracing::warn!("Camera read failed: {:#}", e);
                }
                self.camera_error = Some(e.to_string());
                return;
            }
        };
        self.video_widget.update_frame(ctx, &frame);

        if self.game.phase() != Phase::Playing {
            return;
        }

        let landmarks = self.detect(&frame);
        let now = self.clock.now();
        let report = self.game.step(&landmarks, now);
        for cue in report.cues {
            self.audio.cue(cue);
        }

        if let Some(recorder) = self.recorder.as_mut() {
            let readings = Actor::ALL
                .into_iter()
                .filter_map(|actor| self.game.reading(actor).map(|r| (actor, r)));
            recorder.add_frame(now, readings);
        }
    }

    // Stops music and flushes the gesture log. Safe to call twice.
    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.audio.music(MusicCommand::Stop);

        if let Some(recorder) = self.recorder.as_ref().filter(|r| !r.is_empty()) {
            match recorder.export_csv() {
                Ok(path) => tracing::info!("Saved {} gesture rows to {}", recorder.len(), path.display()),
                Err(e) => tracing::error!("Failed to export gesture log: {:#}", e),
            }
        }
    }

    fn render_debug_panel(&self, ctx: &egui::Context) {
        let Some(mode) = self.game.mode() else {
            return;
        };
        egui::SidePanel::right("debug")
            .resizable(false)
            .min_width(240.0)
            .show(ctx, |ui| {
                ui.add_space(10.0);
                let now = self.clock.now();
                let panels: &[(&str, Actor)] = match mode {
                    Mode::Single => &[("-- DEBUG INFO --", Actor::Player1)],
                    Mode::TwoPlayer => &[("-- P1 DEBUG --", Actor::Player1), ("-- P2 DEBUG --", Actor::Player2)],
                };
                for (i, &(title, actor)) in panels.iter().enumerate() {
                    if i > 0 {
                        ui.separator();
                    }
                    self.renderer.draw_debug_panel(
                        ui,
                        title,
                        self.game.reading(actor),
                        self.game.cooldown_remaining(actor, now),
                    );
                }
                ui.separator();
                ui.label("Space: pause   R: restart   Q: quit");
                if let Some(error) = &self.camera_error {
                    ui.colored_label(self.renderer.theme.error, format!("Camera: {}", error));
                }
            });
    }

    fn render_arena(&mut self, ctx: &egui::Context) {
        let mut chosen = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = self.video_widget.show(ui);
            let arena = ArenaTransform::new(rect, self.game.width(), self.game.height());
            let painter = ui.painter_at(rect);

            self.renderer.draw_arena(&painter, &arena, &self.game);
            self.renderer.draw_overlay(&painter, rect, &self.game);

            if self.game.phase() == Phase::SelectingMode {
                chosen = self.renderer.draw_mode_select(ui, rect);
            }
        });

        if let Some(mode) = chosen {
            self.apply(GameInput::SelectMode(mode));
        }
    }
}

impl eframe::App for FireballApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.handle_keys(ctx) {
            self.shutdown();
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.tick(ctx);
        self.render_debug_panel(ctx);
        self.render_arena(ctx);

        ctx.request_repaint();
    }
}

impl Drop for FireballApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}
