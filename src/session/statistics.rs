use super::Session;
use crate::analysis::{Metrics, Severity};
use serde::{Deserialize, Serialize};

/// Arithmetic means of the scalar metrics over a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricMeans {
    pub left_elbow_angle: f32,
    pub right_elbow_angle: f32,
    pub left_knee_angle: f32,
    pub right_knee_angle: f32,
    pub left_hip_angle: f32,
    pub right_hip_angle: f32,
    pub trunk_tilt: f32,
    pub left_arm_swing_forward: f32,
    pub left_arm_swing_backward: f32,
    pub right_arm_swing_forward: f32,
    pub right_arm_swing_backward: f32,
    pub step_length: f32,
    pub step_width: f32,
    pub com_height: f32,
    pub com_displacement: f32,
    pub left_pole_angle: f32,
    pub right_pole_angle: f32,
}

impl MetricMeans {
    fn add(&mut self, m: &Metrics) {
        self.left_elbow_angle += m.left_elbow_angle;
        self.right_elbow_angle += m.right_elbow_angle;
        self.left_knee_angle += m.left_knee_angle;
        self.right_knee_angle += m.right_knee_angle;
        self.left_hip_angle += m.left_hip_angle;
        self.right_hip_angle += m.right_hip_angle;
        self.trunk_tilt += m.trunk_tilt;
        self.left_arm_swing_forward += m.left_arm_swing_forward;
        self.left_arm_swing_backward += m.left_arm_swing_backward;
        self.right_arm_swing_forward += m.right_arm_swing_forward;
        self.right_arm_swing_backward += m.right_arm_swing_backward;
        self.step_length += m.step_length;
        self.step_width += m.step_width;
        self.com_height += m.com_height;
        self.com_displacement += m.com_displacement;
        self.left_pole_angle += m.left_pole_angle;
        self.right_pole_angle += m.right_pole_angle;
    }

    fn divide(&mut self, n: f32) {
        for value in [
            &mut self.left_elbow_angle,
            &mut self.right_elbow_angle,
            &mut self.left_knee_angle,
            &mut self.right_knee_angle,
            &mut self.left_hip_angle,
            &mut self.right_hip_angle,
            &mut self.trunk_tilt,
            &mut self.left_arm_swing_forward,
            &mut self.left_arm_swing_backward,
            &mut self.right_arm_swing_forward,
            &mut self.right_arm_swing_backward,
            &mut self.step_length,
            &mut self.step_width,
            &mut self.com_height,
            &mut self.com_displacement,
            &mut self.left_pole_angle,
            &mut self.right_pole_angle,
        ] {
            *value /= n;
        }
    }

    /// Means over `metrics`; all zero for an empty slice
    pub fn from_metrics(metrics: &[Metrics]) -> Self {
        let mut means = Self::default();
        if metrics.is_empty() {
            return means;
        }
        for m in metrics {
            means.add(m);
        }
        means.divide(metrics.len() as f32);
        means
    }
}

/// Summary of a recorded session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_frames: usize,
    pub duration_secs: f32,
    pub means: MetricMeans,
    pub total_violations: usize,
    pub critical_violations: usize,
    pub mean_confidence: f32,
}

/// Fold a session into its statistics
pub fn summarize_session(session: &Session) -> Statistics {
    let metrics = session.metrics();
    let mean_confidence = if metrics.is_empty() {
        0.0
    } else {
        metrics.iter().map(|m| m.confidence).sum::<f32>() / metrics.len() as f32
    };

    Statistics {
        total_frames: session.frames().len(),
        duration_secs: session.duration_secs(),
        means: MetricMeans::from_metrics(metrics),
        total_violations: session.violations().len(),
        critical_violations: session
            .violations()
            .iter()
            .filter(|v| v.severity == Severity::Critical)
            .count(),
        mean_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_means() {
        let metrics = [
            Metrics {
                trunk_tilt: 10.0,
                step_length: 0.5,
                confidence: 0.8,
                ..Metrics::default()
            },
            Metrics {
                trunk_tilt: 20.0,
                step_length: 0.7,
                confidence: 0.6,
                ..Metrics::default()
            },
        ];
        let means = MetricMeans::from_metrics(&metrics);
        assert!((means.trunk_tilt - 15.0).abs() < 1e-5);
        assert!((means.step_length - 0.6).abs() < 1e-5);
        assert_eq!(means.left_elbow_angle, 0.0);
    }

    #[test]
    fn test_empty_means() {
        assert_eq!(MetricMeans::from_metrics(&[]), MetricMeans::default());
    }
}
