use super::scoring::{self, PoseIssue, PoseScores};
use crate::pose::Frame;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Scores, issues and advice for one frame of a bulk video scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseAnalysisResult {
    pub frame_index: u32,
    pub timestamp_ms: u64,
    pub landmark_count: usize,
    pub scores: PoseScores,
    pub issues: Vec<PoseIssue>,
    pub recommendations: Vec<String>,
}

impl PoseAnalysisResult {
    /// Whether the detector found a pose in this frame
    pub fn has_pose(&self) -> bool {
        self.landmark_count > 0
    }
}

/// Score a single frame.
///
/// A frame without landmarks still gets its default scores but carries no
/// issues or recommendations.
pub fn analyze_frame(frame: &Frame) -> PoseAnalysisResult {
    let scores = scoring::score(&frame.landmarks);
    let issues = if frame.landmarks.is_empty() {
        Vec::new()
    } else {
        scores.issues()
    };
    let recommendations = issues
        .iter()
        .map(|issue| issue.recommendation().to_string())
        .collect();

    PoseAnalysisResult {
        frame_index: frame.index,
        timestamp_ms: frame.timestamp_ms,
        landmark_count: frame.landmarks.len(),
        scores,
        issues,
        recommendations,
    }
}

/// Score many independent frames in parallel, keeping their order
pub fn analyze_frames(frames: &[Frame]) -> Vec<PoseAnalysisResult> {
    tracing::debug!("Scanning {} frames", frames.len());
    frames.par_iter().map(analyze_frame).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{BodyLandmark as L, Landmark};

    #[test]
    fn test_empty_frame_has_no_advice() {
        let result = analyze_frame(&Frame::empty(3, 99, 640, 480));
        assert!(!result.has_pose());
        assert_eq!(result.scores.posture, 0.0);
        assert!(result.issues.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_issue_carries_recommendation() {
        let frame = Frame::new(
            0,
            0,
            640,
            480,
            vec![
                Landmark::new(L::LeftShoulder, 0.4, 0.3, 0.9),
                Landmark::new(L::RightShoulder, 0.6, 0.45, 0.9),
                Landmark::new(L::LeftHip, 0.4, 0.5, 0.9),
                Landmark::new(L::RightHip, 0.6, 0.65, 0.9),
            ],
        );
        let result = analyze_frame(&frame);
        assert_eq!(result.issues, vec![PoseIssue::ShoulderImbalance]);
        assert_eq!(
            result.recommendations,
            vec![PoseIssue::ShoulderImbalance.recommendation().to_string()]
        );
    }

    #[test]
    fn test_parallel_scan_keeps_order() {
        let frames: Vec<Frame> = (0..64).map(|i| Frame::empty(i, i as u64 * 33, 640, 480)).collect();
        let results = analyze_frames(&frames);
        let indices: Vec<u32> = results.iter().map(|r| r.frame_index).collect();
        assert_eq!(indices, (0..64).collect::<Vec<u32>>());
    }
}
