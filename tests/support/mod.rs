//! Shared frame builders for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use nordic_gait::pose::{BodyLandmark as L, Frame, Landmark};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 14, 8, 0, 0).unwrap()
}

/// A walker seen from the side mid-stride: upright trunk, arms swinging,
/// hands closed, poles slightly behind the body
pub fn walking_frame(index: u32) -> Frame {
    // Sway the torso a little from frame to frame
    let sway = (index % 4) as f32 * 0.005;
    Frame::new(
        index,
        index as u64 * 33,
        1280,
        720,
        vec![
            Landmark::new(L::Nose, 0.50 + sway, 0.12, 0.98),
            Landmark::new(L::LeftShoulder, 0.46 + sway, 0.28, 0.95),
            Landmark::new(L::RightShoulder, 0.54 + sway, 0.28, 0.95),
            Landmark::new(L::LeftElbow, 0.42 + sway, 0.40, 0.9),
            Landmark::new(L::RightElbow, 0.58 + sway, 0.40, 0.9),
            Landmark::new(L::LeftWrist, 0.44 + sway, 0.52, 0.88),
            Landmark::new(L::RightWrist, 0.60 + sway, 0.50, 0.88),
            Landmark::new(L::LeftIndex, 0.44 + sway, 0.55, 0.8),
            Landmark::new(L::RightIndex, 0.60 + sway, 0.53, 0.8),
            Landmark::new(L::LeftHip, 0.47, 0.55, 0.93),
            Landmark::new(L::RightHip, 0.53, 0.55, 0.93),
            Landmark::new(L::LeftKnee, 0.45, 0.72, 0.9),
            Landmark::new(L::RightKnee, 0.56, 0.72, 0.9),
            Landmark::new(L::LeftAnkle, 0.42, 0.90, 0.85),
            Landmark::new(L::RightAnkle, 0.58, 0.90, 0.85),
        ],
    )
}

/// Same walker bent far forward at the waist
pub fn hunched_frame(index: u32) -> Frame {
    let mut frame = walking_frame(index);
    for landmark in frame.landmarks.iter_mut() {
        if matches!(landmark.id, L::Nose | L::LeftShoulder | L::RightShoulder) {
            landmark.x += 0.25;
            landmark.y += 0.1;
        }
    }
    frame
}
