// src/landmarks.rs - Pose landmark frames and the sources that produce them
use anyhow::Result;
use image::DynamicImage;
use nalgebra::Vector3;

// MediaPipe pose landmark indices
const LEFT_SHOULDER: usize = 11;
const RIGHT_SHOULDER: usize = 12;
const LEFT_ELBOW: usize = 13;
const RIGHT_ELBOW: usize = 14;
const LEFT_WRIST: usize = 15;
const RIGHT_WRIST: usize = 16;
const POSE_LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
}

impl Joint {
    pub const ALL: [Joint; 6] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
    ];

    pub fn pose_index(self) -> usize {
        match self {
            Joint::LeftShoulder => LEFT_SHOULDER,
            Joint::RightShoulder => RIGHT_SHOULDER,
            Joint::LeftElbow => LEFT_ELBOW,
            Joint::RightElbow => RIGHT_ELBOW,
            Joint::LeftWrist => LEFT_WRIST,
            Joint::RightWrist => RIGHT_WRIST,
        }
    }

    fn slot(self) -> usize {
        self.pose_index() - LEFT_SHOULDER
    }
}

// x and y are normalized to the detection image; smaller z is closer to the camera
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    joints: [Vector3<f64>; 6],
}

impl LandmarkFrame {
    pub fn from_joints(joints: impl IntoIterator<Item = (Joint, Vector3<f64>)>) -> Self {
        let mut frame = Self {
            joints: [Vector3::zeros(); 6],
        };
        for (joint, position) in joints {
            frame.joints[joint.slot()] = position;
        }
        frame
    }

    // Builds a frame from a full pose landmark list. Lists too short to
    // contain both wrists count as no detection.
    pub fn from_pose_landmarks(landmarks: &[[f64; 3]]) -> Option<Self> {
        if landmarks.len() <= RIGHT_WRIST {
            return None;
        }
        Some(Self::from_joints(Joint::ALL.iter().map(|&joint| {
            let [x, y, z] = landmarks[joint.pose_index()];
            (joint, Vector3::new(x, y, z))
        })))
    }

    pub fn get(&self, joint: Joint) -> Vector3<f64> {
        self.joints[joint.slot()]
    }

    pub fn average_wrist_depth(&self) -> f64 {
        (self.get(Joint::LeftWrist).z + self.get(Joint::RightWrist).z) / 2.0
    }
}

// The pose model seam. `Ok(None)` means nobody was confidently detected.
pub trait LandmarkSource {
    fn infer(&mut self, image: &DynamicImage) -> Result<Option<LandmarkFrame>>;
}

// Which way a simulated body throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Right,
    Left,
}

// Scripted stand-in for a pose model: a body that winds up with bent arms,
// then straightens them and pushes forward, on a fixed frame cycle.
pub struct SimulatedPose {
    facing: Facing,
    frame: u32,
    period: u32,
}

impl SimulatedPose {
    pub fn new(facing: Facing) -> Self {
        Self {
            facing,
            frame: 0,
            period: 60,
        }
    }

    fn pose_at(&self, frame: u32) -> Option<LandmarkFrame> {
        let t = frame % self.period;
        let sway = 0.03 * (frame as f64 * 0.05).sin();
        let sign = match self.facing {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        };

        // Last tenth of the cycle is the thrust
        let thrust_start = self.period - self.period / 10;
        let (reach, depth) = if t >= thrust_start {
            let progress = (t - thrust_start + 1) as f64;
            (0.12, -0.04 * progress)
        } else {
            (0.0, 0.0)
        };

        let shoulder_x = 0.5 - sign * 0.05 + sway;
        let elbow_x = shoulder_x + sign * 0.1;
        let wrist_x = elbow_x + sign * reach;
        let wrist_y_drop = if reach > 0.05 { 0.0 } else { 0.15 };

        // Emit the same full landmark list a pose model would
        let mut landmarks = [[0.5, 0.5, 0.0]; POSE_LANDMARK_COUNT];
        for (joint, position) in [
            (Joint::LeftShoulder, [shoulder_x, 0.38, 0.0]),
            (Joint::RightShoulder, [shoulder_x, 0.42, 0.0]),
            (Joint::LeftElbow, [elbow_x, 0.38, 0.0]),
            (Joint::RightElbow, [elbow_x, 0.42, 0.0]),
            (Joint::LeftWrist, [wrist_x, 0.38 + wrist_y_drop, depth]),
            (Joint::RightWrist, [wrist_x, 0.42 + wrist_y_drop, depth]),
        ] {
            landmarks[joint.pose_index()] = position;
        }
        LandmarkFrame::from_pose_landmarks(&landmarks)
    }
}

impl LandmarkSource for SimulatedPose {
    fn infer(&mut self, _image: &DynamicImage) -> Result<Option<LandmarkFrame>> {
        let frame = self.pose_at(self.frame);
        self.frame = self.frame.wrapping_add(1);
        Ok(frame)
    }
}
