// src/main.rs
mod actor;
mod ai;
mod app;
mod audio;
mod clock;
mod combat;
mod config;
mod cooldown;
mod fireball;
mod game;
mod gesture;
mod landmarks;
mod match_state;
mod telemetry;
mod ui;
mod video;

use anyhow::{Context, Result};
use eframe::egui;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = config::GameConfig::load(std::env::args().nth(1).map(PathBuf::from))?;

    let cameras = video::list_cameras();
    tracing::info!("Found {} camera(s)", cameras.len());
    for (i, name) in cameras.iter().enumerate() {
        tracing::info!("  [{}] {}", i, name);
    }

    // The arena is sized from the first frame, so the camera must work up front
    let mut camera = video::VideoSource::open(config.camera_index)?;
    let first_frame = camera
        .read_frame()
        .with_context(|| format!("Camera {} produced no readable frame", camera.index()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Fireball Duel",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(create_visuals());
            Box::new(app::FireballApp::new(config, camera, &first_frame))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Error running application: {}", e))
}

fn create_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = egui::Color32::from_rgb(20, 20, 25);
    visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(30, 30, 35);
    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(45, 45, 52);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(55, 55, 65);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgb(70, 130, 240);

    visuals.widgets.inactive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(8.0);
    visuals.widgets.active.rounding = egui::Rounding::same(8.0);
    visuals.window_rounding = egui::Rounding::same(12.0);

    visuals
}
