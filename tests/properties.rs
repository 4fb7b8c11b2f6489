mod support;

use nordic_gait::analysis::{compute_metrics, detect_violations, score, Metrics};
use nordic_gait::pose::{BodyLandmark, Frame, Landmark};
use nordic_gait::session::{summarize_session, Direction, SessionRecorder, SessionSource};
use proptest::prelude::*;
use support::start_time;

fn landmark_strategy(id: BodyLandmark) -> impl Strategy<Value = Landmark> {
    (-0.2f32..1.2, -0.2f32..1.2, 0.0f32..=1.0).prop_map(move |(x, y, c)| Landmark::new(id, x, y, c))
}

fn frame_strategy(index: u32) -> impl Strategy<Value = Frame> {
    (
        proptest::sample::subsequence(BodyLandmark::ALL.to_vec(), 0..=BodyLandmark::ALL.len()),
        0u32..4000,
        0u32..4000,
    )
        .prop_flat_map(move |(ids, width, height)| {
            let landmarks: Vec<_> = ids.into_iter().map(landmark_strategy).collect();
            landmarks.prop_map(move |landmarks| {
                Frame::new(index, index as u64 * 33, width, height, landmarks)
            })
        })
}

fn frames_strategy() -> impl Strategy<Value = Vec<Frame>> {
    (0usize..20).prop_flat_map(|n| (0..n as u32).map(frame_strategy).collect::<Vec<_>>())
}

fn scalars(m: &Metrics) -> [f32; 18] {
    [
        m.left_elbow_angle,
        m.right_elbow_angle,
        m.left_knee_angle,
        m.right_knee_angle,
        m.left_hip_angle,
        m.right_hip_angle,
        m.trunk_tilt,
        m.left_arm_swing_forward,
        m.left_arm_swing_backward,
        m.right_arm_swing_forward,
        m.right_arm_swing_backward,
        m.step_length,
        m.step_width,
        m.com_height,
        m.com_displacement,
        m.left_pole_angle,
        m.right_pole_angle,
        m.confidence,
    ]
}

proptest! {
    #[test]
    fn metrics_are_finite_and_repeatable(frame in frame_strategy(3), previous in frame_strategy(2)) {
        let first = compute_metrics(&frame, Some(&previous));
        let second = compute_metrics(&frame, Some(&previous));
        prop_assert_eq!(first, second);
        for value in scalars(&first) {
            prop_assert!(value.is_finite());
        }
        prop_assert!(first.left_elbow_angle >= 0.0 && first.left_elbow_angle <= 180.0);
        prop_assert!(first.com_displacement >= 0.0);
    }

    #[test]
    fn bare_frame_gives_zero_metrics(width in 0u32..4000, height in 0u32..4000, index in 0u32..1000) {
        let frame = Frame::empty(index, 7, width, height);
        let metrics = compute_metrics(&frame, None);
        prop_assert_eq!(
            metrics,
            Metrics { frame_index: index, timestamp_ms: 7, ..Metrics::default() }
        );
        prop_assert!(detect_violations(&frame, &metrics, "s").is_empty());
    }

    #[test]
    fn violations_are_repeatable(frame in frame_strategy(5)) {
        let metrics = compute_metrics(&frame, None);
        let first = detect_violations(&frame, &metrics, "s");
        let second = detect_violations(&frame, &metrics, "s");
        prop_assert_eq!(&first, &second);
        for violation in &first {
            prop_assert_eq!(violation.frame_index, 5);
            prop_assert!(!violation.suggestion.is_empty());
        }
    }

    #[test]
    fn scores_stay_in_range(frame in frame_strategy(0)) {
        let scores = score(&frame.landmarks);
        for value in [scores.posture, scores.balance, scores.arm_swing, scores.overall()] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn sessions_stay_aligned(frames in frames_strategy()) {
        let n = frames.len();
        let mut recorder = SessionRecorder::with_id("p", Direction::Left, SessionSource::Video, start_time());
        for frame in frames {
            recorder.record(frame);
        }
        let session = recorder.finish(start_time());

        prop_assert_eq!(session.frames().len(), n);
        prop_assert_eq!(session.metrics().len(), n);
        for violation in session.violations() {
            prop_assert!(session.frames().iter().any(|f| f.index == violation.frame_index));
        }

        let stats = summarize_session(&session);
        prop_assert_eq!(stats.total_frames, n);
        prop_assert!(stats.critical_violations <= stats.total_violations);
        prop_assert!(stats.mean_confidence >= 0.0 && stats.mean_confidence <= 1.0 + 1e-5);
    }
}
