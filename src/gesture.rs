// src/gesture.rs - Turns per-frame arm landmarks into throw decisions
use crate::actor::{Actor, ThrowState};
use crate::config::GestureConfig;
use crate::cooldown::Cooldown;
use crate::landmarks::{Joint, LandmarkFrame};
use nalgebra::{Point2, Vector2, Vector3};

// Fireball target is placed this many direction-lengths past the origin.
const TARGET_REACH: f64 = 100.0;

// The pixel region a player's landmarks are normalized against. In split
// screen the right player's half starts at `offset_x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
}

impl Viewport {
    pub fn full(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_x: 0.0,
        }
    }

    pub fn to_pixels(&self, landmark: &Vector3<f64>) -> Point2<f64> {
        Point2::new(landmark.x * self.width + self.offset_x, landmark.y * self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub owner: Actor,
    pub origin: Point2<f64>,
    pub target: Point2<f64>,
}

// Everything the classifier worked out for one actor in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureReading {
    pub left_angle: f64,
    pub right_angle: f64,
    pub arms_straight: bool,
    pub forward_velocity: f64,
    pub thrusting: bool,
    // Degrees, image convention (positive y points down).
    pub fire_angle: f64,
    pub direction: Vector2<f64>,
    pub magnitude: f64,
    pub forward_valid: bool,
    pub upward_valid: bool,
    pub cooldown_ready: bool,
    pub fired: bool,
}

impl GestureReading {
    pub fn aim_valid(&self) -> bool {
        self.forward_valid && self.upward_valid
    }
}

#[derive(Debug, Clone)]
pub struct ThrowDecision {
    pub reading: GestureReading,
    pub spawn: Option<SpawnRequest>,
    pub state: ThrowState,
}

// Elbow angle in degrees in the image plane; a collapsed arm gives 0
pub fn elbow_angle(shoulder: &Vector3<f64>, elbow: &Vector3<f64>, wrist: &Vector3<f64>) -> f64 {
    let upper = Vector2::new(shoulder.x - elbow.x, shoulder.y - elbow.y);
    let forearm = Vector2::new(wrist.x - elbow.x, wrist.y - elbow.y);

    let mag1 = upper.norm();
    let mag2 = forearm.norm();
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }

    let cos_angle = (upper.dot(&forearm) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees().clamp(0.0, 180.0)
}

// Unit vector along `v`, or straight up when `v` has no length.
pub fn unit_or_up(v: &Vector2<f64>) -> Vector2<f64> {
    let magnitude = v.norm();
    if magnitude > 0.0 {
        *v / magnitude
    } else {
        Vector2::new(0.0, -1.0)
    }
}

pub struct GestureClassifier {
    config: GestureConfig,
    player_cooldown: f64,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig, player_cooldown: f64) -> Self {
        Self {
            config,
            player_cooldown,
        }
    }

    // Heart sits a little below the midpoint of the shoulders.
    pub fn heart_position(&self, frame: &LandmarkFrame, viewport: &Viewport) -> Point2<f64> {
        let left = viewport.to_pixels(&frame.get(Joint::LeftShoulder));
        let right = viewport.to_pixels(&frame.get(Joint::RightShoulder));
        let mid = nalgebra::center(&left, &right);
        Point2::new(mid.x, mid.y + self.config.heart_offset_y)
    }

    // The caller owns `state` and stores the returned one
    pub fn classify(
        &self,
        actor: Actor,
        frame: &LandmarkFrame,
        viewport: &Viewport,
        state: ThrowState,
        now: f64,
    ) -> ThrowDecision {
        let left_angle = elbow_angle(
            &frame.get(Joint::LeftShoulder),
            &frame.get(Joint::LeftElbow),
            &frame.get(Joint::LeftWrist),
        );
        let right_angle = elbow_angle(
            &frame.get(Joint::RightShoulder),
            &frame.get(Joint::RightElbow),
            &frame.get(Joint::RightWrist),
        );
        let arms_straight = left_angle > self.config.arm_straight_angle
            && right_angle > self.config.arm_straight_angle;

        let wrist_z = frame.average_wrist_depth();
        let forward_velocity = state.last_wrist_z.map_or(0.0, |last| last - wrist_z);
        let thrusting = forward_velocity.abs() >= self.config.thrust_sensitivity;

        let wrist_mid = nalgebra::center(
            &viewport.to_pixels(&frame.get(Joint::LeftWrist)),
            &viewport.to_pixels(&frame.get(Joint::RightWrist)),
        );
        let elbow_mid = nalgebra::center(
            &viewport.to_pixels(&frame.get(Joint::LeftElbow)),
            &viewport.to_pixels(&frame.get(Joint::RightElbow)),
        );
        let direction = wrist_mid - elbow_mid;
        let magnitude = direction.norm();
        let fire_angle = direction.y.atan2(direction.x).to_degrees();

        let forward_valid = if actor.throws_rightward() {
            direction.x > 0.0
        } else {
            direction.x < 0.0
        };
        let upward_valid = magnitude == 0.0 || direction.y / magnitude <= self.config.upward_limit;
        let cooldown_ready = state.cooldown.is_ready(now);

        let fired = arms_straight && thrusting && forward_valid && upward_valid && cooldown_ready;

        let reading = GestureReading {
            left_angle,
            right_angle,
            arms_straight,
            forward_velocity,
            thrusting,
            fire_angle,
            direction,
            magnitude,
            forward_valid,
            upward_valid,
            cooldown_ready,
            fired,
        };

        if !fired {
            return ThrowDecision {
                reading,
                spawn: None,
                state: ThrowState {
                    last_wrist_z: Some(wrist_z),
                    cooldown: state.cooldown,
                },
            };
        }

        let unit = unit_or_up(&direction);
        let origin = wrist_mid + unit * self.config.palm_offset;
        let target = origin + direction * TARGET_REACH;

        tracing::debug!(
            ?actor,
            angle = fire_angle,
            velocity = forward_velocity,
            "throw fired"
        );

        ThrowDecision {
            reading,
            spawn: Some(SpawnRequest {
                owner: actor,
                origin,
                target,
            }),
            // Dropping the depth sample forces one dead frame before the
            // next thrust can be measured.
            state: ThrowState {
                last_wrist_z: None,
                cooldown: Cooldown::armed(now, self.player_cooldown),
            },
        }
    }
}
