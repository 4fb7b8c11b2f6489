use crate::pose::geometry::{self, angle_from_vertical, joint_angle, pixel_distance};
use crate::pose::{BodyLandmark as L, Frame};
use serde::{Deserialize, Serialize};

/// Assumed body-height-to-frame ratio applied to the ankle separation
pub const STEP_LENGTH_SCALE: f32 = 1.8;
/// Scale applied to the lateral ankle separation
pub const STEP_WIDTH_SCALE: f32 = 0.6;
/// Fraction of the nose-to-ankle span taken as the center-of-mass height
pub const COM_HEIGHT_RATIO: f32 = 0.55;
/// Wrist to index-finger Manhattan distance above which a hand is open
pub const HAND_OPEN_DISTANCE: f32 = 0.15;

/// Biomechanical measurements for one frame.
///
/// Every field defaults to zero (or `false`) when the landmarks it needs
/// are missing. Step and center-of-mass values are heuristic proxies, not
/// calibrated physical lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub frame_index: u32,
    pub timestamp_ms: u64,

    pub left_elbow_angle: f32,
    pub right_elbow_angle: f32,
    pub left_knee_angle: f32,
    pub right_knee_angle: f32,
    pub left_hip_angle: f32,
    pub right_hip_angle: f32,

    /// Signed lean of the torso away from vertical, degrees
    pub trunk_tilt: f32,

    pub left_arm_swing_forward: f32,
    pub left_arm_swing_backward: f32,
    pub right_arm_swing_forward: f32,
    pub right_arm_swing_backward: f32,

    pub step_length: f32,
    pub step_width: f32,

    pub com_height: f32,
    pub com_displacement: f32,

    pub left_hand_open: bool,
    pub right_hand_open: bool,

    pub left_pole_angle: f32,
    pub right_pole_angle: f32,

    /// Mean landmark confidence
    pub confidence: f32,
}

impl Metrics {
    /// Mean of the four arm-swing angles
    pub fn mean_arm_swing(&self) -> f32 {
        (self.left_arm_swing_forward
            + self.left_arm_swing_backward
            + self.right_arm_swing_forward
            + self.right_arm_swing_backward)
            / 4.0
    }

    /// True when no arm-swing angle could be measured
    pub fn arm_swing_missing(&self) -> bool {
        self.left_arm_swing_forward == 0.0
            && self.left_arm_swing_backward == 0.0
            && self.right_arm_swing_forward == 0.0
            && self.right_arm_swing_backward == 0.0
    }
}

/// Derive the metrics of `frame`.
///
/// `previous` is only read for the center-of-mass displacement. Never
/// fails: each metric whose landmarks are absent stays at zero.
pub fn compute_metrics(frame: &Frame, previous: Option<&Frame>) -> Metrics {
    let _span = tracing::debug_span!("compute_metrics", frame = frame.index).entered();

    // The swing samples reuse the full elbow angle for both halves of the swing
    let left_elbow_angle = angle_at(frame, L::LeftShoulder, L::LeftElbow, L::LeftWrist);
    let right_elbow_angle = angle_at(frame, L::RightShoulder, L::RightElbow, L::RightWrist);

    let com_height = center_of_mass_height(frame);
    let com_displacement = match (com_height, previous.and_then(center_of_mass_height)) {
        (Some(current), Some(before)) => (current - before).abs(),
        _ => 0.0,
    };

    Metrics {
        frame_index: frame.index,
        timestamp_ms: frame.timestamp_ms,
        left_elbow_angle,
        right_elbow_angle,
        left_knee_angle: angle_at(frame, L::LeftHip, L::LeftKnee, L::LeftAnkle),
        right_knee_angle: angle_at(frame, L::RightHip, L::RightKnee, L::RightAnkle),
        left_hip_angle: angle_at(frame, L::LeftShoulder, L::LeftHip, L::LeftKnee),
        right_hip_angle: angle_at(frame, L::RightShoulder, L::RightHip, L::RightKnee),
        trunk_tilt: trunk_tilt(frame),
        left_arm_swing_forward: left_elbow_angle,
        left_arm_swing_backward: left_elbow_angle,
        right_arm_swing_forward: right_elbow_angle,
        right_arm_swing_backward: right_elbow_angle,
        step_length: step_length(frame),
        step_width: step_width(frame),
        com_height: com_height.unwrap_or(0.0),
        com_displacement,
        left_hand_open: hand_open(frame, L::LeftWrist, L::LeftIndex),
        right_hand_open: hand_open(frame, L::RightWrist, L::RightIndex),
        left_pole_angle: pole_angle(frame, L::LeftShoulder, L::LeftWrist),
        right_pole_angle: pole_angle(frame, L::RightShoulder, L::RightWrist),
        confidence: frame.mean_confidence(),
    }
}

fn angle_at(frame: &Frame, a: L, vertex: L, b: L) -> f32 {
    let (width, height) = frame.dimensions();
    match (frame.landmark(a), frame.landmark(vertex), frame.landmark(b)) {
        (Some(a), Some(vertex), Some(b)) => joint_angle(a, vertex, b, width, height),
        _ => 0.0,
    }
}

fn trunk_tilt(frame: &Frame) -> f32 {
    let (Some(shoulders), Some(hips)) = (
        frame.pair(L::LeftShoulder, L::RightShoulder),
        frame.pair(L::LeftHip, L::RightHip),
    ) else {
        return 0.0;
    };
    let (width, height) = frame.dimensions();
    let (sx, sy) = geometry::midpoint(shoulders.0, shoulders.1);
    let (hx, hy) = geometry::midpoint(hips.0, hips.1);
    angle_from_vertical((sx * width, sy * height), (hx * width, hy * height))
}

fn step_length(frame: &Frame) -> f32 {
    let Some((left, right)) = frame.pair(L::LeftAnkle, L::RightAnkle) else {
        return 0.0;
    };
    let (width, height) = frame.dimensions();
    if height <= 0.0 {
        return 0.0;
    }
    pixel_distance(left, right, width, height) / height * STEP_LENGTH_SCALE
}

fn step_width(frame: &Frame) -> f32 {
    let Some((left, right)) = frame.pair(L::LeftAnkle, L::RightAnkle) else {
        return 0.0;
    };
    let (width, _) = frame.dimensions();
    if width <= 0.0 {
        return 0.0;
    }
    ((left.x - right.x) * width).abs() / width * STEP_WIDTH_SCALE
}

fn center_of_mass_height(frame: &Frame) -> Option<f32> {
    let nose = frame.landmark(L::Nose)?;
    // Ankle midpoint, or whichever ankle is present
    let ankle_y = match (frame.landmark(L::LeftAnkle), frame.landmark(L::RightAnkle)) {
        (Some(left), Some(right)) => (left.y + right.y) / 2.0,
        (Some(ankle), None) | (None, Some(ankle)) => ankle.y,
        (None, None) => return None,
    };
    Some((ankle_y - nose.y).abs() * COM_HEIGHT_RATIO)
}

fn hand_open(frame: &Frame, wrist: L, finger: L) -> bool {
    frame
        .pair(wrist, finger)
        .map(|(wrist, finger)| geometry::manhattan_distance(wrist, finger) > HAND_OPEN_DISTANCE)
        .unwrap_or(false)
}

fn pole_angle(frame: &Frame, shoulder: L, wrist: L) -> f32 {
    let Some((shoulder, wrist)) = frame.pair(shoulder, wrist) else {
        return 0.0;
    };
    let (width, height) = frame.dimensions();
    angle_from_vertical(
        geometry::to_pixels(shoulder, width, height),
        geometry::to_pixels(wrist, width, height),
    )
}
