pub mod geometry;
mod types;

pub use types::{find_landmark, BodyLandmark, Frame, Landmark, LANDMARK_COUNT, VISIBILITY_THRESHOLD};
