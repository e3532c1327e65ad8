// src/ui.rs - Arena overlay drawn on top of the camera texture
use crate::actor::Actor;
use crate::game::{Game, PlayArea};
use crate::gesture::GestureReading;
use crate::match_state::{Mode, Phase};
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};
use image::DynamicImage;
use nalgebra::Point2;

#[derive(Debug, Clone)]
pub struct Theme {
    pub error: Color32,
    pub success: Color32,
    pub text_primary: Color32,
    pub fireball_player1: Color32,
    pub fireball_opponent: Color32,
    pub heart_player: Color32,
    pub heart_ai: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            error: Color32::from_rgb(244, 67, 54),
            success: Color32::from_rgb(76, 175, 80),
            text_primary: Color32::WHITE,
            fireball_player1: Color32::from_rgb(255, 165, 0),
            fireball_opponent: Color32::from_rgb(255, 0, 255),
            heart_player: Color32::from_rgb(230, 30, 30),
            heart_ai: Color32::from_rgb(30, 60, 230),
        }
    }
}

impl Theme {
    pub fn fireball_color(&self, owner: Actor) -> Color32 {
        match owner {
            Actor::Player1 => self.fireball_player1,
            Actor::Player2 | Actor::Ai => self.fireball_opponent,
        }
    }

    pub fn heart_color(&self, actor: Actor) -> Color32 {
        match actor {
            Actor::Player1 | Actor::Player2 => self.heart_player,
            Actor::Ai => self.heart_ai,
        }
    }

    fn flag(&self, ok: bool) -> Color32 {
        if ok {
            self.success
        } else {
            self.error
        }
    }
}

// Maps arena pixels (camera frame coordinates) onto the widget rectangle.
#[derive(Debug, Clone, Copy)]
pub struct ArenaTransform {
    rect: Rect,
    scale: Vec2,
}

impl ArenaTransform {
    pub fn new(rect: Rect, arena_width: f64, arena_height: f64) -> Self {
        Self {
            rect,
            scale: Vec2::new(
                rect.width() / arena_width.max(1.0) as f32,
                rect.height() / arena_height.max(1.0) as f32,
            ),
        }
    }

    pub fn to_screen(&self, p: &Point2<f64>) -> Pos2 {
        Pos2::new(
            self.rect.left() + p.x as f32 * self.scale.x,
            self.rect.top() + p.y as f32 * self.scale.y,
        )
    }

    // Radii are scaled by the smaller axis so circles stay round.
    pub fn length(&self, len: f64) -> f32 {
        len as f32 * self.scale.x.min(self.scale.y)
    }

    pub fn area(&self, area: &PlayArea) -> Rect {
        Rect::from_min_max(self.to_screen(&area.min), self.to_screen(&area.max))
    }
}

// Parametric heart curve around `center`; `size` scales the 16-unit wide shape.
pub fn heart_outline(center: Pos2, size: f32) -> Vec<Pos2> {
    (0..126)
        .map(|i| {
            let t = i as f32 * 0.05;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            Pos2::new(center.x + size * x, center.y - size * y)
        })
        .collect()
}

// Splits a straight line into `dash`-long pieces with equal gaps.
pub fn dash_segments(from: Pos2, to: Pos2, dash: f32) -> Vec<[Pos2; 2]> {
    let total = from.distance(to);
    if total <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let dir = (to - from) / total;
    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < total {
        let end = (start + dash).min(total);
        segments.push([from + dir * start, from + dir * end]);
        start += dash * 2.0;
    }
    segments
}

fn draw_heart(painter: &egui::Painter, center: Pos2, size: f32, color: Color32) {
    // The curve is star-shaped around a point slightly above its centre
    let hub = Pos2::new(center.x, center.y - size * 2.0);
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(hub, color);
    let outline = heart_outline(center, size);
    for p in &outline {
        mesh.colored_vertex(*p, color);
    }
    let n = outline.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, i + 1, (i + 1) % n + 1);
    }
    painter.add(egui::Shape::mesh(mesh));
}

fn draw_dashed_rect(painter: &egui::Painter, rect: Rect, stroke: Stroke, dash: f32) {
    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
    for i in 0..4 {
        for segment in dash_segments(corners[i], corners[(i + 1) % 4], dash) {
            painter.line_segment(segment, stroke);
        }
    }
}

pub struct ArenaRenderer {
    pub theme: Theme,
}

impl ArenaRenderer {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
        }
    }

    // Two big buttons; returns the mode that was clicked.
    pub fn draw_mode_select(&self, ui: &mut egui::Ui, rect: Rect) -> Option<Mode> {
        let button = Vec2::new(rect.width() * 0.35, 100.0);
        let gap = rect.width() * 0.05;
        let top = rect.center().y - button.y / 2.0;
        let single = Rect::from_min_size(Pos2::new(rect.center().x - gap - button.x, top), button);
        let two = Rect::from_min_size(Pos2::new(rect.center().x + gap, top), button);

        let mut chosen = None;
        let text = |label: &str| egui::RichText::new(label).size(28.0).color(Color32::BLACK);
        if ui
            .put(single, egui::Button::new(text("Single Player")).fill(self.theme.success))
            .clicked()
        {
            chosen = Some(Mode::Single);
        }
        if ui
            .put(two, egui::Button::new(text("Two Player")).fill(self.theme.error))
            .clicked()
        {
            chosen = Some(Mode::TwoPlayer);
        }
        chosen
    }

    pub fn draw_arena(&self, painter: &egui::Painter, arena: &ArenaTransform, game: &Game) {
        let Some(mode) = game.mode() else {
            return;
        };

        if mode == Mode::TwoPlayer {
            self.draw_play_areas(painter, arena, game);
        }

        let radius = arena.length(game.fireball_radius());
        for fireball in game.fireballs() {
            let color = self.theme.fireball_color(fireball.owner);
            let trail: Vec<_> = fireball.trail().collect();
            let count = trail.len().max(1) as f32;
            for (i, point) in trail.iter().enumerate() {
                let fade = (i + 1) as f32 / count;
                painter.circle_filled(arena.to_screen(point), radius * 0.5 * fade, color.gamma_multiply(fade * 0.6));
            }
            let center = arena.to_screen(&fireball.position);
            painter.circle_filled(center, radius, color);
            painter.circle_stroke(center, radius, Stroke::new(2.0, self.theme.text_primary));
        }

        let contestants: &[Actor] = match mode {
            Mode::Single => &[Actor::Player1, Actor::Ai],
            Mode::TwoPlayer => &[Actor::Player1, Actor::Player2],
        };
        for &actor in contestants {
            if let Some(heart) = game.actor(actor).heart {
                let center = arena.to_screen(&heart);
                draw_heart(
                    painter,
                    center,
                    arena.length(game.heart_radius() / 3.0),
                    self.theme.heart_color(actor),
                );
                painter.text(
                    center,
                    egui::Align2::CENTER_CENTER,
                    actor.display_name(mode),
                    egui::FontId::proportional(14.0),
                    self.theme.text_primary,
                );
            }
        }

        self.draw_health(painter, arena, mode, contestants, game);
    }

    fn draw_health(&self, painter: &egui::Painter, arena: &ArenaTransform, mode: Mode, contestants: &[Actor], game: &Game) {
        let y = arena.to_screen(&Point2::new(0.0, game.height() - 60.0)).y;
        for (i, &actor) in contestants.iter().enumerate() {
            let text = format!("{} Health: {}", actor.display_name(mode), game.actor(actor).health);
            let (x, align) = if i == 0 {
                (arena.to_screen(&Point2::new(10.0, 0.0)).x, egui::Align2::LEFT_CENTER)
            } else {
                (arena.to_screen(&Point2::new(game.width() - 10.0, 0.0)).x, egui::Align2::RIGHT_CENTER)
            };
            painter.text(Pos2::new(x, y), align, text, egui::FontId::proportional(22.0), self.theme.success);
        }
    }

    fn draw_play_areas(&self, painter: &egui::Painter, arena: &ArenaTransform, game: &Game) {
        for actor in [Actor::Player1, Actor::Player2] {
            let Some(area) = game.play_area(actor) else {
                continue;
            };
            let rect = arena.area(&area);
            draw_dashed_rect(painter, rect, Stroke::new(2.0, self.theme.text_primary), 15.0);

            if game.out_of_bounds(actor) {
                let half_x = game.split_x();
                let (left, right) = match actor {
                    Actor::Player1 => (0.0, half_x),
                    Actor::Player2 | Actor::Ai => (half_x, game.width()),
                };
                let half = Rect::from_min_max(
                    arena.to_screen(&Point2::new(left, 0.0)),
                    arena.to_screen(&Point2::new(right, game.height())),
                );
                painter.rect_filled(half, 0.0, self.theme.error.gamma_multiply(0.3));
                painter.text(
                    half.center(),
                    egui::Align2::CENTER_CENTER,
                    "Return to your area!",
                    egui::FontId::proportional(22.0),
                    self.theme.text_primary,
                );
            }
        }
    }

    pub fn draw_overlay(&self, painter: &egui::Painter, rect: Rect, game: &Game) {
        match game.phase() {
            Phase::Paused => {
                painter.rect_filled(rect, 0.0, Color32::from_black_alpha(140));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "PAUSED",
                    egui::FontId::proportional(64.0),
                    self.theme.text_primary,
                );
            }
            Phase::GameOver => {
                if let (Some(winner), Some(mode)) = (game.winner(), game.mode()) {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("{} Wins!", winner.display_name(mode)),
                        egui::FontId::proportional(72.0),
                        self.theme.success,
                    );
                }
                painter.text(
                    rect.center() + Vec2::new(0.0, 70.0),
                    egui::Align2::CENTER_CENTER,
                    "Press 'r' to restart",
                    egui::FontId::proportional(24.0),
                    self.theme.text_primary,
                );
            }
            Phase::SelectingMode | Phase::Playing => {}
        }
    }

    // Classifier internals for one side, for tuning thresholds live.
    pub fn draw_debug_panel(
        &self,
        ui: &mut egui::Ui,
        title: &str,
        reading: Option<&GestureReading>,
        cooldown_remaining: f64,
    ) {
        ui.label(egui::RichText::new(title).strong().color(self.theme.text_primary));
        let Some(r) = reading else {
            ui.label("No player detected");
            return;
        };

        let yes_no = |b: bool| if b { "YES" } else { "NO" };
        ui.label(format!("Arm Angles (L/R): {:.1} / {:.1}", r.left_angle, r.right_angle));
        ui.colored_label(
            self.theme.flag(r.arms_straight),
            format!("Arms Straight: {}", yes_no(r.arms_straight)),
        );
        ui.label(format!("Fwd Velocity: {:.4}", r.forward_velocity));
        ui.colored_label(self.theme.flag(r.thrusting), format!("Thrusting: {}", yes_no(r.thrusting)));
        ui.colored_label(self.theme.flag(r.aim_valid()), format!("Fire Angle: {:.1}", r.fire_angle));
        ui.colored_label(
            self.theme.flag(r.cooldown_ready),
            if r.cooldown_ready {
                "Cooldown: ready".to_string()
            } else {
                format!("Cooldown: {:.2}s", cooldown_remaining)
            },
        );
    }
}

impl Default for ArenaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// Custom widget for video display
pub struct VideoWidget {
    texture: Option<egui::TextureHandle>,
    aspect_ratio: f32,
}

impl VideoWidget {
    pub fn new() -> Self {
        Self {
            texture: None,
            aspect_ratio: 4.0 / 3.0,
        }
    }

    pub fn update_frame(&mut self, ctx: &egui::Context, frame: &DynamicImage) {
        let size = [frame.width() as _, frame.height() as _];
        let rgba = frame.to_rgba8();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice());
        self.aspect_ratio = frame.width() as f32 / frame.height().max(1) as f32;

        match &mut self.texture {
            Some(texture) => texture.set(color_image, Default::default()),
            None => self.texture = Some(ctx.load_texture("video_frame", color_image, Default::default())),
        }
    }

    // Allocates the largest rect with the frame's aspect ratio and returns it
    // so overlays can be painted on top.
    pub fn show(&self, ui: &mut egui::Ui) -> Rect {
        let available = ui.available_size();
        let mut size = Vec2::new(available.x, available.x / self.aspect_ratio);
        if size.y > available.y {
            size = Vec2::new(available.y * self.aspect_ratio, available.y);
        }
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());

        match &self.texture {
            Some(texture) => {
                ui.painter().image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                ui.painter().rect_filled(rect, egui::Rounding::same(4.0), Color32::from_rgb(50, 50, 55));
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No Video Signal",
                    egui::FontId::proportional(16.0),
                    Color32::from_rgb(150, 150, 155),
                );
            }
        }
        rect
    }
}

impl Default for VideoWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_maps_corners_to_rect() {
        let rect = Rect::from_min_max(Pos2::new(10.0, 20.0), Pos2::new(330.0, 260.0));
        let arena = ArenaTransform::new(rect, 640.0, 480.0);
        assert_eq!(arena.to_screen(&Point2::new(0.0, 0.0)), Pos2::new(10.0, 20.0));
        assert_eq!(arena.to_screen(&Point2::new(640.0, 480.0)), Pos2::new(330.0, 260.0));
        assert_eq!(arena.length(50.0), 25.0);
    }

    #[test]
    fn dashes_alternate_with_gaps() {
        let segments = dash_segments(Pos2::new(0.0, 0.0), Pos2::new(50.0, 0.0), 10.0);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], [Pos2::new(20.0, 0.0), Pos2::new(30.0, 0.0)]);
        assert_eq!(segments[2][1], Pos2::new(50.0, 0.0));
        assert!(dash_segments(Pos2::ZERO, Pos2::ZERO, 10.0).is_empty());
    }

    #[test]
    fn heart_outline_is_symmetric() {
        let outline = heart_outline(Pos2::new(100.0, 100.0), 1.0);
        let min_x = outline.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = outline.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((100.0 - min_x - (max_x - 100.0)).abs() < 0.1);
        assert!(max_x - min_x > 31.0);
    }

    #[test]
    fn owner_colors() {
        let theme = Theme::default();
        assert_eq!(theme.fireball_color(Actor::Player1), theme.fireball_player1);
        assert_eq!(theme.fireball_color(Actor::Ai), theme.fireball_color(Actor::Player2));
        assert_ne!(theme.heart_color(Actor::Ai), theme.heart_color(Actor::Player1));
    }
}
