use super::metrics::Metrics;
use crate::pose::Frame;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Technique defects a rule can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    ExcessiveTrunkTilt,
    InsufficientArmSwing,
    PoorHandPosition,
    ImproperPoleAngle,
    UnevenStride,
    PoorPosture,
    Other,
}

impl ViolationKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::ExcessiveTrunkTilt => "excessive_trunk_tilt",
            Self::InsufficientArmSwing => "insufficient_arm_swing",
            Self::PoorHandPosition => "poor_hand_position",
            Self::ImproperPoleAngle => "improper_pole_angle",
            Self::UnevenStride => "uneven_stride",
            Self::PoorPosture => "poor_posture",
            Self::Other => "other",
        }
    }

    /// Fixed coaching advice for this kind of defect
    pub fn suggestion(self) -> &'static str {
        match self {
            Self::ExcessiveTrunkTilt => {
                "Keep the torso upright with a slight forward lean from the ankles, not the waist."
            }
            Self::InsufficientArmSwing => {
                "Swing the arms further forward and back, driving the movement from the shoulder."
            }
            Self::PoorHandPosition => {
                "Open the hand only as the pole passes the hip and close it again on the forward swing."
            }
            Self::ImproperPoleAngle => {
                "Plant the pole tip level with the heel of the front foot with the shaft angled backwards."
            }
            Self::UnevenStride => "Aim for an even, rhythmic stride on both sides.",
            Self::PoorPosture => "Lift the chest, relax the shoulders and look ahead.",
            Self::Other => "Review this part of the recording together with your coach.",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A rule-triggered technique defect raised against one frame of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// `session:frame:kind`, unique within and across sessions
    pub id: String,
    pub session_id: String,
    pub frame_index: u32,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
}

impl Violation {
    pub fn new(
        session_id: &str,
        frame_index: u32,
        kind: ViolationKind,
        severity: Severity,
        description: String,
    ) -> Self {
        Self {
            id: format!("{}:{}:{}", session_id, frame_index, kind.code()),
            session_id: session_id.to_string(),
            frame_index,
            kind,
            severity,
            description,
            suggestion: kind.suggestion().to_string(),
        }
    }
}

/// Thresholds of the per-frame technique rules. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationRules {
    /// Trunk tilt (degrees) above which a warning is raised
    pub trunk_tilt_warning: f32,
    /// Trunk tilt (degrees) above which the warning becomes critical
    pub trunk_tilt_critical: f32,
    /// Mean swing angle (degrees) below which the arm swing is insufficient
    pub min_arm_swing: f32,
    /// Pole angle (degrees) above which the pole is planted wrongly
    pub max_pole_angle: f32,
}

impl Default for ViolationRules {
    fn default() -> Self {
        Self {
            trunk_tilt_warning: 25.0,
            trunk_tilt_critical: 35.0,
            min_arm_swing: 30.0,
            max_pole_angle: 60.0,
        }
    }
}

impl ViolationRules {
    /// Apply every rule to one frame's metrics.
    ///
    /// Pure: identical inputs give identical violations, ids included.
    pub fn detect(&self, frame: &Frame, metrics: &Metrics, session_id: &str) -> Vec<Violation> {
        let mut violations = Vec::new();
        let frame_index = frame.index;

        let tilt = metrics.trunk_tilt.abs();
        if tilt > self.trunk_tilt_warning {
            let severity = if tilt > self.trunk_tilt_critical {
                Severity::Critical
            } else {
                Severity::Warning
            };
            violations.push(Violation::new(
                session_id,
                frame_index,
                ViolationKind::ExcessiveTrunkTilt,
                severity,
                format!(
                    "Trunk tilt of {:.1}° exceeds {:.0}°",
                    metrics.trunk_tilt, self.trunk_tilt_warning
                ),
            ));
        }

        // An unmeasured arm swing reads as all zeros and must not count as a short one
        if !metrics.arm_swing_missing() {
            let swing = metrics.mean_arm_swing();
            if swing < self.min_arm_swing {
                violations.push(Violation::new(
                    session_id,
                    frame_index,
                    ViolationKind::InsufficientArmSwing,
                    Severity::Warning,
                    format!(
                        "Average arm swing of {:.1}° is below {:.0}°",
                        swing, self.min_arm_swing
                    ),
                ));
            }
        }

        if metrics.left_hand_open && metrics.right_hand_open {
            violations.push(Violation::new(
                session_id,
                frame_index,
                ViolationKind::PoorHandPosition,
                Severity::Info,
                "Both hands are open at the same time".to_string(),
            ));
        }

        let left = metrics.left_pole_angle.abs();
        let right = metrics.right_pole_angle.abs();
        if left > self.max_pole_angle || right > self.max_pole_angle {
            violations.push(Violation::new(
                session_id,
                frame_index,
                ViolationKind::ImproperPoleAngle,
                Severity::Warning,
                format!(
                    "Pole angle of {:.1}° (left) / {:.1}° (right) exceeds {:.0}°",
                    metrics.left_pole_angle, metrics.right_pole_angle, self.max_pole_angle
                ),
            ));
        }

        for violation in &violations {
            tracing::debug!(
                "Frame {}: {} {}",
                frame_index,
                violation.severity,
                violation.description
            );
        }

        violations
    }
}

/// Apply the default rules to one frame's metrics
pub fn detect_violations(frame: &Frame, metrics: &Metrics, session_id: &str) -> Vec<Violation> {
    ViolationRules::default().detect(frame, metrics, session_id)
}
