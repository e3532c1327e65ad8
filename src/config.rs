// src/config.rs - Game tuning constants with optional JSON override
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("AI cooldown range is inverted: min {min} > max {max}")]
    InvertedAiCooldown { min: f64, max: f64 },
    #[error("default health must be at least 1")]
    ZeroHealth,
    #[error("camera zoom must be >= 1.0, got {0}")]
    ZoomBelowOne(f64),
    #[error("upward limit must lie in (-1, 1], got {0}")]
    UpwardLimitOutOfRange(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    // Sizes, in pixels
    pub heart_radius: f64,
    pub fireball_radius: f64,
    // Pixels travelled per simulated frame.
    pub fireball_speed: f64,

    pub default_health: u32,
    // Seconds between two throws of the same human player.
    pub player_cooldown: f64,
    pub ai_min_cooldown: f64,
    pub ai_max_cooldown: f64,

    pub gesture: GestureConfig,

    // Radians added to the AI sway phase every frame.
    pub ai_animation_speed: f64,
    pub ai_animation_range: f64,
    // Distance of the AI base point from the right edge.
    pub ai_edge_inset: f64,
    // Horizontal distance between the AI heart and its muzzle.
    pub ai_muzzle_offset: f64,
    // Fixed RNG seed for the AI; entropy when absent
    pub ai_seed: Option<u64>,

    // Two-player only: inset of each player's dashed area.
    pub playable_area_margin: f64,
    pub camera_zoom: f64,
    pub camera_index: u32,

    pub record_gestures: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    // Minimum elbow angle (degrees) for an arm to count as straight.
    pub arm_straight_angle: f64,
    // Minimum change in average wrist depth between frames.
    pub thrust_sensitivity: f64,
    // Throws whose normalized downward component exceeds this are rejected.
    pub upward_limit: f64,
    pub palm_offset: f64,
    // Heart sits this many pixels below the shoulder midpoint.
    pub heart_offset_y: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            arm_straight_angle: 100.0,
            thrust_sensitivity: 0.02,
            upward_limit: 0.8,
            palm_offset: 30.0,
            heart_offset_y: 30.0,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            heart_radius: 15.0,
            fireball_radius: 50.0,
            fireball_speed: 50.0,
            default_health: 2,
            player_cooldown: 0.5,
            ai_min_cooldown: 1.5,
            ai_max_cooldown: 2.5,
            gesture: GestureConfig::default(),
            ai_animation_speed: 0.1,
            ai_animation_range: 80.0,
            ai_edge_inset: 100.0,
            ai_muzzle_offset: 30.0,
            ai_seed: None,
            playable_area_margin: 30.0,
            camera_zoom: 1.0,
            camera_index: 0,
            record_gestures: false,
            output_directory: directories::UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(|p| p.join("FireballDuel")))
                .unwrap_or_else(|| PathBuf::from("./output")),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("heart_radius", self.heart_radius),
            ("fireball_radius", self.fireball_radius),
            ("fireball_speed", self.fireball_speed),
            ("player_cooldown", self.player_cooldown),
            ("ai_min_cooldown", self.ai_min_cooldown),
            ("gesture.arm_straight_angle", self.gesture.arm_straight_angle),
            ("gesture.thrust_sensitivity", self.gesture.thrust_sensitivity),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.ai_min_cooldown > self.ai_max_cooldown {
            return Err(ConfigError::InvertedAiCooldown {
                min: self.ai_min_cooldown,
                max: self.ai_max_cooldown,
            });
        }
        if self.default_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }
        if !(self.camera_zoom >= 1.0) {
            return Err(ConfigError::ZoomBelowOne(self.camera_zoom));
        }
        let limit = self.gesture.upward_limit;
        if !(limit > -1.0 && limit <= 1.0) {
            return Err(ConfigError::UpwardLimitOutOfRange(limit));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid game config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("In config file {}", path.display()))
    }

    // Explicit path wins; otherwise the platform config dir is tried and
    // defaults are used when nothing is there.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            _ => {
                tracing::info!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "fireballduel", "FireballDuel")
        .map(|dirs| dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.default_health, 2);
        assert_eq!(config.gesture.arm_straight_angle, 100.0);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = GameConfig::from_json(
            r#"{ "default_health": 5, "gesture": { "thrust_sensitivity": 0.05 } }"#,
        )
        .unwrap();
        assert_eq!(config.default_health, 5);
        assert_eq!(config.gesture.thrust_sensitivity, 0.05);
        assert_eq!(config.gesture.upward_limit, 0.8);
        assert_eq!(config.heart_radius, 15.0);
    }

    #[test]
    fn inverted_ai_cooldown_is_rejected() {
        let config = GameConfig {
            ai_min_cooldown: 3.0,
            ai_max_cooldown: 1.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedAiCooldown { min: 3.0, max: 1.0 })
        );
    }

    #[test]
    fn ai_seed_is_optional() {
        assert_eq!(GameConfig::default().ai_seed, None);
        let config = GameConfig::from_json(r#"{ "ai_seed": 1234 }"#).unwrap();
        assert_eq!(config.ai_seed, Some(1234));
    }

    #[test]
    fn zoom_below_one_is_rejected() {
        let err = GameConfig::from_json(r#"{ "camera_zoom": 0.5 }"#).unwrap_err();
        assert!(err.to_string().contains("zoom"));
    }

    #[test]
    fn nan_radius_is_rejected() {
        let config = GameConfig {
            heart_radius: f64::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "heart_radius", .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "player_cooldown": 1.25 }"#).unwrap();

        let config = GameConfig::load(Some(path)).unwrap();
        assert_eq!(config.player_cooldown, 1.25);
    }
}
