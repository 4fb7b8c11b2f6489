mod metrics;
mod scan;
mod scoring;
mod violations;

pub use metrics::{
    compute_metrics, Metrics, COM_HEIGHT_RATIO, HAND_OPEN_DISTANCE, STEP_LENGTH_SCALE, STEP_WIDTH_SCALE,
};
pub use scan::{analyze_frame, analyze_frames, PoseAnalysisResult};
pub use scoring::{score, PoseIssue, PoseScores, ISSUE_THRESHOLD, NEUTRAL_SCORE};
pub use violations::{detect_violations, Severity, Violation, ViolationKind, ViolationRules};
