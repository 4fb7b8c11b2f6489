mod recorder;
mod report;
mod statistics;
mod summary;

pub use recorder::SessionRecorder;
pub use report::generate_report;
pub use statistics::{summarize_session, MetricMeans, Statistics};
pub use summary::{summarize_scan, ScanSummary, COMMON_ISSUE_SHARE, MAX_RECOMMENDATIONS};

use crate::analysis::{Metrics, Violation};
use crate::pose::Frame;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of the walker facing the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Front,
    Back,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown direction '{}', expected front, back, left or right", other)),
        }
    }
}

/// Where the frames of a session came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSource {
    Camera,
    Video,
}

impl SessionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for SessionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SessionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "camera" => Ok(Self::Camera),
            "video" => Ok(Self::Video),
            other => Err(format!("unknown source '{}', expected camera or video", other)),
        }
    }
}

/// A bounded recording of frames with their metrics and violations.
///
/// Built through [`SessionRecorder`]; `metrics` runs parallel to `frames`
/// and every violation points at one of the recorded frames.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    student_id: Option<String>,
    video_uri: Option<String>,
    direction: Direction,
    source: SessionSource,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    frames: Vec<Frame>,
    metrics: Vec<Metrics>,
    violations: Vec<Violation>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    pub fn video_uri(&self) -> Option<&str> {
        self.video_uri.as_deref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn source(&self) -> SessionSource {
        self.source
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn is_sealed(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn metrics(&self) -> &[Metrics] {
        &self.metrics
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Seconds between start and end, 0 while the session is still open
    pub fn duration_secs(&self) -> f32 {
        match self.ended_at {
            Some(ended_at) => (ended_at - self.started_at).num_milliseconds().max(0) as f32 / 1000.0,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("LEFT".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(Direction::Back.to_string(), "back");
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("video".parse::<SessionSource>(), Ok(SessionSource::Video));
        assert_eq!(SessionSource::Camera.to_string(), "camera");
        assert!("tape".parse::<SessionSource>().is_err());
    }
}
