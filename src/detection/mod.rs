mod decode;

pub use decode::{landmarks_from_tensor, tensor_from_rows, DecodeError};

use crate::pose::{Frame, Landmark};
use anyhow::Result;
use image::RgbImage;

/// Trait for pose-estimation models
/// Allows swapping between different backends (BlazePose, MoveNet, remote services, etc.)
pub trait PoseDetector {
    /// Detect the body landmarks visible in a frame
    ///
    /// # Returns
    /// * Landmarks with coordinates normalized to the image, absent ones omitted
    fn detect(&mut self, image: &RgbImage) -> Result<Vec<Landmark>>;

    /// Reset internal state (for models that track across frames)
    ///
    /// Call this when starting a new session or after a scene cut
    fn reset_state(&mut self) {
        // Default implementation: no-op for stateless models
    }

    /// Get the model's preferred input dimensions
    ///
    /// Returns (width, height)
    fn input_size(&self) -> (u32, u32);
}

/// Run the detector on one image.
///
/// A detector failure is logged and yields a frame without landmarks, so
/// every downstream computation falls back to its defaults.
pub fn detect_frame(detector: &mut dyn PoseDetector, image: &RgbImage, index: u32, timestamp_ms: u64) -> Frame {
    let _span = tracing::debug_span!("detect_frame", frame = index).entered();
    let (width, height) = image.dimensions();

    match detector.detect(image) {
        Ok(landmarks) => Frame::new(index, timestamp_ms, width, height, landmarks),
        Err(err) => {
            tracing::warn!("Pose detection failed on frame {}: {:#}", index, err);
            Frame::empty(index, timestamp_ms, width, height)
        }
    }
}
