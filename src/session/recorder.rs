use super::{Direction, Session, SessionSource};
use crate::analysis::{compute_metrics, Violation, ViolationRules};
use crate::pose::Frame;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Builds a [`Session`] frame by frame.
///
/// Dropping the recorder before [`finish`](Self::finish) cancels the
/// session; nothing computed so far needs undoing.
pub struct SessionRecorder {
    session: Session,
    rules: ViolationRules,
}

impl SessionRecorder {
    /// Start a session with a fresh random id
    pub fn start(direction: Direction, source: SessionSource, started_at: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), direction, source, started_at)
    }

    pub fn with_id(
        id: impl Into<String>,
        direction: Direction,
        source: SessionSource,
        started_at: DateTime<Utc>,
    ) -> Self {
        let session = Session {
            id: id.into(),
            student_id: None,
            video_uri: None,
            direction,
            source,
            started_at,
            ended_at: None,
            frames: Vec::new(),
            metrics: Vec::new(),
            violations: Vec::new(),
        };
        tracing::info!("Session {} started ({}, {})", session.id, direction, source);

        Self {
            session,
            rules: ViolationRules::default(),
        }
    }

    pub fn student(mut self, student_id: impl Into<String>) -> Self {
        self.session.student_id = Some(student_id.into());
        self
    }

    pub fn video_uri(mut self, uri: impl Into<String>) -> Self {
        self.session.video_uri = Some(uri.into());
        self
    }

    pub fn rules(mut self, rules: ViolationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    pub fn frame_count(&self) -> usize {
        self.session.frames.len()
    }

    /// Analyze and append one frame, returning the violations it raised.
    ///
    /// Frame indices must keep increasing within a session because violation
    /// ids are keyed by them. A frame that repeats or goes back is renumbered
    /// to follow the last recorded one.
    pub fn record(&mut self, mut frame: Frame) -> &[Violation] {
        if let Some(last) = self.session.frames.last() {
            if frame.index <= last.index {
                let next = last.index.saturating_add(1);
                tracing::warn!(
                    "Frame index {} does not follow {}, recording it as {}",
                    frame.index,
                    last.index,
                    next
                );
                frame.index = next;
            }
        }

        let metrics = compute_metrics(&frame, self.session.frames.last());
        let violations = self.rules.detect(&frame, &metrics, &self.session.id);

        let first_new = self.session.violations.len();
        self.session.violations.extend(violations);
        self.session.frames.push(frame);
        self.session.metrics.push(metrics);

        &self.session.violations[first_new..]
    }

    /// Seal the session
    pub fn finish(mut self, ended_at: DateTime<Utc>) -> Session {
        self.session.ended_at = Some(ended_at);
        tracing::info!(
            "Session {} finished: {} frames, {} violations",
            self.session.id,
            self.session.frames.len(),
            self.session.violations.len()
        );
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ViolationKind;
    use crate::pose::{BodyLandmark as L, Landmark};
    use chrono::{Duration, TimeZone};

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 9, 30, 0).unwrap()
    }

    fn leaning_frame(index: u32) -> Frame {
        Frame::new(
            index,
            index as u64 * 100,
            100,
            100,
            vec![
                Landmark::new(L::LeftShoulder, 0.3, 0.4, 0.9),
                Landmark::new(L::RightShoulder, 0.7, 0.4, 0.9),
                Landmark::new(L::LeftHip, 0.5, 0.6, 0.9),
                Landmark::new(L::RightHip, 0.9, 0.6, 0.9),
            ],
        )
    }

    #[test]
    fn test_empty_session() {
        let session = SessionRecorder::with_id("s1", Direction::Front, SessionSource::Camera, start_time())
            .finish(start_time());
        assert!(session.is_sealed());
        assert!(session.frames().is_empty());
        assert!(session.metrics().is_empty());
        assert_eq!(session.duration_secs(), 0.0);
    }

    #[test]
    fn test_record_keeps_sequences_parallel() {
        let mut recorder = SessionRecorder::with_id("s2", Direction::Left, SessionSource::Video, start_time())
            .student("student-7")
            .video_uri("file:///walks/monday.mp4");

        for index in 0..5 {
            let raised = recorder.record(leaning_frame(index));
            assert_eq!(raised.len(), 1);
            assert_eq!(raised[0].kind, ViolationKind::ExcessiveTrunkTilt);
            assert_eq!(raised[0].frame_index, index);
        }
        assert_eq!(recorder.frame_count(), 5);

        let session = recorder.finish(start_time() + Duration::milliseconds(2500));
        assert_eq!(session.frames().len(), 5);
        assert_eq!(session.metrics().len(), 5);
        assert_eq!(session.violations().len(), 5);
        assert_eq!(session.student_id(), Some("student-7"));
        assert_eq!(session.video_uri(), Some("file:///walks/monday.mp4"));
        assert!((session.duration_secs() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_frame_index_keeps_violation_ids_unique() {
        let mut recorder = SessionRecorder::with_id("s", Direction::Front, SessionSource::Video, start_time());
        recorder.record(leaning_frame(0));
        recorder.record(leaning_frame(0));
        recorder.record(leaning_frame(7));
        recorder.record(leaning_frame(3));
        let session = recorder.finish(start_time());

        let indices: Vec<u32> = session.frames().iter().map(|f| f.index).collect();
        assert_eq!(indices, [0, 1, 7, 8]);
        let metric_indices: Vec<u32> = session.metrics().iter().map(|m| m.frame_index).collect();
        assert_eq!(metric_indices, indices);

        let ids: Vec<&str> = session.violations().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "s:0:excessive_trunk_tilt",
                "s:1:excessive_trunk_tilt",
                "s:7:excessive_trunk_tilt",
                "s:8:excessive_trunk_tilt",
            ]
        );
    }

    #[test]
    fn test_generated_ids_differ() {
        let a = SessionRecorder::start(Direction::Front, SessionSource::Camera, start_time());
        let b = SessionRecorder::start(Direction::Front, SessionSource::Camera, start_time());
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn test_custom_rules_apply() {
        let rules = ViolationRules {
            trunk_tilt_warning: 60.0,
            trunk_tilt_critical: 70.0,
            ..ViolationRules::default()
        };
        let mut recorder =
            SessionRecorder::with_id("s3", Direction::Front, SessionSource::Camera, start_time()).rules(rules);
        assert!(recorder.record(leaning_frame(0)).is_empty());
    }
}
