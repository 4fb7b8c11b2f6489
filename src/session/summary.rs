use crate::analysis::{PoseAnalysisResult, PoseIssue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An issue is common once it shows up in more than this share of frames
pub const COMMON_ISSUE_SHARE: f64 = 0.2;

/// Number of distinct recommendations kept in a summary
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Aggregate of a bulk video scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub frames_analyzed: usize,
    pub posture_score: f32,
    pub balance_score: f32,
    pub arm_swing_score: f32,
    pub overall_score: f32,
    pub common_issues: Vec<PoseIssue>,
    pub top_recommendations: Vec<String>,
}

/// Fold per-frame scan results into one summary
pub fn summarize_scan(results: &[PoseAnalysisResult]) -> ScanSummary {
    if results.is_empty() {
        return ScanSummary::default();
    }

    let n = results.len() as f32;
    let posture_score = results.iter().map(|r| r.scores.posture).sum::<f32>() / n;
    let balance_score = results.iter().map(|r| r.scores.balance).sum::<f32>() / n;
    let arm_swing_score = results.iter().map(|r| r.scores.arm_swing).sum::<f32>() / n;

    // Share is taken against this batch's own frame count
    let common_issues = PoseIssue::ALL
        .into_iter()
        .filter(|issue| {
            let frames_with_issue = results.iter().filter(|r| r.issues.contains(issue)).count();
            frames_with_issue as f64 / results.len() as f64 > COMMON_ISSUE_SHARE
        })
        .collect();

    let mut top_recommendations: Vec<String> = Vec::new();
    for recommendation in results.iter().flat_map(|r| r.recommendations.iter()) {
        if top_recommendations.len() == MAX_RECOMMENDATIONS {
            break;
        }
        if !top_recommendations.contains(recommendation) {
            top_recommendations.push(recommendation.clone());
        }
    }

    ScanSummary {
        frames_analyzed: results.len(),
        posture_score,
        balance_score,
        arm_swing_score,
        overall_score: (posture_score + balance_score + arm_swing_score) / 3.0,
        common_issues,
        top_recommendations,
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Video scan summary")?;
        writeln!(f, "Frames analyzed: {}", self.frames_analyzed)?;
        writeln!(f, "Overall score: {:.1}", self.overall_score)?;
        writeln!(f, "  Posture: {:.1}", self.posture_score)?;
        writeln!(f, "  Balance: {:.1}", self.balance_score)?;
        writeln!(f, "  Arm swing: {:.1}", self.arm_swing_score)?;

        writeln!(f, "Common issues:")?;
        if self.common_issues.is_empty() {
            writeln!(f, "  none")?;
        }
        for issue in &self.common_issues {
            writeln!(f, "  - {}", issue)?;
        }

        writeln!(f, "Recommendations:")?;
        if self.top_recommendations.is_empty() {
            writeln!(f, "  none")?;
        }
        for recommendation in &self.top_recommendations {
            writeln!(f, "  - {}", recommendation)?;
        }
        Ok(())
    }
}
