//! Coarse technique scores straight from landmark geometry.
//!
//! Used for bulk scans of video frames where the full metric pipeline is
//! not run. All distances are in normalized image units.

use crate::pose::{find_landmark, BodyLandmark as L, Landmark};
use serde::{Deserialize, Serialize};
use std::fmt;

const POSTURE_BASE: f32 = 85.0;
const POSTURE_LEVEL_TOLERANCE: f32 = 0.1;
const POSTURE_PENALTY: f32 = 10.0;

const BALANCE_BASE: f32 = 90.0;
const BALANCE_RATIO_RANGE: (f32, f32) = (0.8, 1.2);
const BALANCE_PENALTY: f32 = 20.0;

const ARM_SWING_BASE: f32 = 85.0;
const ARM_SWING_MIN_DISPLACEMENT: f32 = 0.1;
const ARM_SWING_MAX_ASYMMETRY: f32 = 0.15;
const ARM_SWING_INSUFFICIENT_PENALTY: f32 = 20.0;
const ARM_SWING_ASYMMETRY_PENALTY: f32 = 15.0;

/// Score returned when the landmarks a heuristic needs are missing
pub const NEUTRAL_SCORE: f32 = 85.0;

/// Scores below this raise the matching issue
pub const ISSUE_THRESHOLD: f32 = 70.0;

/// Quality sub-scores, each within `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseScores {
    pub posture: f32,
    pub balance: f32,
    pub arm_swing: f32,
}

impl PoseScores {
    /// Issues implied by low sub-scores, in a fixed order
    pub fn issues(&self) -> Vec<PoseIssue> {
        let mut issues = Vec::new();
        if self.posture < ISSUE_THRESHOLD {
            issues.push(PoseIssue::ShoulderImbalance);
        }
        if self.balance < ISSUE_THRESHOLD {
            issues.push(PoseIssue::HipImbalance);
        }
        if self.arm_swing < ISSUE_THRESHOLD {
            issues.push(PoseIssue::InsufficientArmSwing);
        }
        issues
    }

    pub fn overall(&self) -> f32 {
        (self.posture + self.balance + self.arm_swing) / 3.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseIssue {
    ShoulderImbalance,
    HipImbalance,
    InsufficientArmSwing,
}

impl PoseIssue {
    pub const ALL: [PoseIssue; 3] = [
        Self::ShoulderImbalance,
        Self::HipImbalance,
        Self::InsufficientArmSwing,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Self::ShoulderImbalance => "Shoulders are not level",
            Self::HipImbalance => "Feet are not tracking under the hips",
            Self::InsufficientArmSwing => "Arm swing is short or one-sided",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Self::ShoulderImbalance => "Relax both shoulders and keep them level while walking.",
            Self::HipImbalance => "Keep the feet roughly hip-width apart and shift weight evenly.",
            Self::InsufficientArmSwing => {
                "Let both arms swing freely and equally from the shoulder, hands passing the hips."
            }
        }
    }
}

impl fmt::Display for PoseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Score one pose
pub fn score(landmarks: &[Landmark]) -> PoseScores {
    let _span = tracing::debug_span!("score", landmarks = landmarks.len()).entered();
    PoseScores {
        posture: posture_score(landmarks),
        balance: balance_score(landmarks),
        arm_swing: arm_swing_score(landmarks),
    }
}

fn pair(landmarks: &[Landmark], a: L, b: L) -> Option<(Landmark, Landmark)> {
    Some((*find_landmark(landmarks, a)?, *find_landmark(landmarks, b)?))
}

fn posture_score(landmarks: &[Landmark]) -> f32 {
    if landmarks.is_empty() {
        return 0.0;
    }

    let mut score = POSTURE_BASE;
    if let Some((left, right)) = pair(landmarks, L::LeftShoulder, L::RightShoulder) {
        if (left.y - right.y).abs() > POSTURE_LEVEL_TOLERANCE {
            score -= POSTURE_PENALTY;
        }
    }
    if let Some((left, right)) = pair(landmarks, L::LeftHip, L::RightHip) {
        if (left.y - right.y).abs() > POSTURE_LEVEL_TOLERANCE {
            score -= POSTURE_PENALTY;
        }
    }
    score.clamp(0.0, 100.0)
}

fn balance_score(landmarks: &[Landmark]) -> f32 {
    let (Some((left_hip, right_hip)), Some((left_ankle, right_ankle))) = (
        pair(landmarks, L::LeftHip, L::RightHip),
        pair(landmarks, L::LeftAnkle, L::RightAnkle),
    ) else {
        return NEUTRAL_SCORE;
    };

    let hip_width = (left_hip.x - right_hip.x).abs();
    if hip_width <= f32::EPSILON {
        return NEUTRAL_SCORE;
    }
    let ankle_width = (left_ankle.x - right_ankle.x).abs();
    let ratio = ankle_width / hip_width;

    let mut score = BALANCE_BASE;
    if ratio < BALANCE_RATIO_RANGE.0 || ratio > BALANCE_RATIO_RANGE.1 {
        score -= BALANCE_PENALTY;
    }
    score.clamp(0.0, 100.0)
}

fn arm_swing_score(landmarks: &[Landmark]) -> f32 {
    let (Some((left_shoulder, left_elbow)), Some((right_shoulder, right_elbow))) = (
        pair(landmarks, L::LeftShoulder, L::LeftElbow),
        pair(landmarks, L::RightShoulder, L::RightElbow),
    ) else {
        return NEUTRAL_SCORE;
    };

    let left = (left_elbow.y - left_shoulder.y).abs();
    let right = (right_elbow.y - right_shoulder.y).abs();

    let mut score = ARM_SWING_BASE;
    if left < ARM_SWING_MIN_DISPLACEMENT || right < ARM_SWING_MIN_DISPLACEMENT {
        score -= ARM_SWING_INSUFFICIENT_PENALTY;
    }
    if (left - right).abs() > ARM_SWING_MAX_ASYMMETRY {
        score -= ARM_SWING_ASYMMETRY_PENALTY;
    }
    score.clamp(0.0, 100.0)
}
