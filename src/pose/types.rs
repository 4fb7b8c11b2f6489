use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of keypoints in the body-pose topology
pub const LANDMARK_COUNT: usize = 33;

/// Confidence a landmark must exceed to count as visible
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Keypoints of the 33-point body-pose topology, numbered as the detector emits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// All keypoints in index order
    pub const ALL: [BodyLandmark; LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

impl From<BodyLandmark> for u8 {
    fn from(landmark: BodyLandmark) -> Self {
        landmark as u8
    }
}

impl TryFrom<u8> for BodyLandmark {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize)
            .ok_or_else(|| format!("landmark id {} outside 0..{}", value, LANDMARK_COUNT))
    }
}

impl fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single detected keypoint.
///
/// Coordinates are normalized to the source image (roughly `[0, 1]`),
/// `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: BodyLandmark,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    pub confidence: f32,
}

impl Landmark {
    pub fn new(id: BodyLandmark, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            id,
            x,
            y,
            z: 0.0,
            confidence,
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.confidence > VISIBILITY_THRESHOLD
    }
}

/// Look up a landmark by id; the first match wins
pub fn find_landmark(landmarks: &[Landmark], id: BodyLandmark) -> Option<&Landmark> {
    landmarks.iter().find(|landmark| landmark.id == id)
}

/// One detector invocation: every landmark found in a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: u32,
    pub timestamp_ms: u64,
    /// Source image width in pixels
    pub width: u32,
    /// Source image height in pixels
    pub height: u32,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl Frame {
    pub fn new(index: u32, timestamp_ms: u64, width: u32, height: u32, landmarks: Vec<Landmark>) -> Self {
        Self {
            index,
            timestamp_ms,
            width,
            height,
            landmarks,
        }
    }

    /// A frame in which the detector found nobody
    pub fn empty(index: u32, timestamp_ms: u64, width: u32, height: u32) -> Self {
        Self::new(index, timestamp_ms, width, height, Vec::new())
    }

    pub fn landmark(&self, id: BodyLandmark) -> Option<&Landmark> {
        find_landmark(&self.landmarks, id)
    }

    /// Both landmarks, or `None` if either is absent
    pub fn pair(&self, a: BodyLandmark, b: BodyLandmark) -> Option<(&Landmark, &Landmark)> {
        Some((self.landmark(a)?, self.landmark(b)?))
    }

    /// Image dimensions as floats, for denormalizing coordinates
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Mean confidence over all landmarks, 0 for an empty frame
    pub fn mean_confidence(&self) -> f32 {
        if self.landmarks.is_empty() {
            return 0.0;
        }
        let total: f32 = self.landmarks.iter().map(|l| l.confidence).sum();
        total / self.landmarks.len() as f32
    }
}
