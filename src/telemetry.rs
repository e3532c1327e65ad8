// src/telemetry.rs - Per-frame gesture readings exported as CSV for threshold tuning
use crate::actor::Actor;
use crate::gesture::GestureReading;
use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct GestureRecord {
    timestamp: f64,
    frame: u64,
    actor: &'static str,
    left_angle: f64,
    right_angle: f64,
    arms_straight: bool,
    forward_velocity: f64,
    thrusting: bool,
    fire_angle: f64,
    direction_x: f64,
    direction_y: f64,
    forward_valid: bool,
    upward_valid: bool,
    cooldown_ready: bool,
    fired: bool,
}

impl GestureRecord {
    fn new(timestamp: f64, frame: u64, actor: Actor, reading: &GestureReading) -> Self {
        Self {
            timestamp,
            frame,
            actor: match actor {
                Actor::Player1 => "player1",
                Actor::Player2 => "player2",
                Actor::Ai => "ai",
            },
            left_angle: reading.left_angle,
            right_angle: reading.right_angle,
            arms_straight: reading.arms_straight,
            forward_velocity: reading.forward_velocity,
            thrusting: reading.thrusting,
            fire_angle: reading.fire_angle,
            direction_x: reading.direction.x,
            direction_y: reading.direction.y,
            forward_valid: reading.forward_valid,
            upward_valid: reading.upward_valid,
            cooldown_ready: reading.cooldown_ready,
            fired: reading.fired,
        }
    }
}

pub struct SessionRecorder {
    output_dir: PathBuf,
    session_name: String,
    records: Vec<GestureRecord>,
    frame: u64,
}

impl SessionRecorder {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name =
            session_name.unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Vec::new(),
            frame: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Records every actor that produced a reading this frame.
    pub fn add_frame<'a>(&mut self, timestamp: f64, readings: impl IntoIterator<Item = (Actor, &'a GestureReading)>) {
        for (actor, reading) in readings {
            self.records
                .push(GestureRecord::new(timestamp, self.frame, actor, reading));
        }
        self.frame += 1;
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.output_dir.join(&self.session_name).join("gestures.csv");

        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!(rows = self.records.len(), path = %csv_path.display(), "gesture log exported");
        Ok(csv_path)
    }
}
