//! Planar geometry over normalized landmarks.
//!
//! Angles and distances are measured in pixel space so that a non-square
//! frame does not skew them.

use super::types::Landmark;

/// Denormalize a landmark into pixel coordinates
pub fn to_pixels(landmark: &Landmark, width: f32, height: f32) -> (f32, f32) {
    (landmark.x * width, landmark.y * height)
}

/// Angle in degrees at `vertex` between the rays towards `a` and `b`.
///
/// Returns 0 when either ray has no length.
pub fn joint_angle(a: &Landmark, vertex: &Landmark, b: &Landmark, width: f32, height: f32) -> f32 {
    let (ax, ay) = to_pixels(a, width, height);
    let (vx, vy) = to_pixels(vertex, width, height);
    let (bx, by) = to_pixels(b, width, height);

    let (ux, uy) = (ax - vx, ay - vy);
    let (wx, wy) = (bx - vx, by - vy);

    let norm = ux.hypot(uy) * wx.hypot(wy);
    if norm <= f32::EPSILON {
        return 0.0;
    }

    let cos = ((ux * wx + uy * wy) / norm).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Euclidean distance in pixels
pub fn pixel_distance(a: &Landmark, b: &Landmark, width: f32, height: f32) -> f32 {
    let (ax, ay) = to_pixels(a, width, height);
    let (bx, by) = to_pixels(b, width, height);
    (ax - bx).hypot(ay - by)
}

/// Midpoint in normalized coordinates
pub fn midpoint(a: &Landmark, b: &Landmark) -> (f32, f32) {
    ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Signed angle in degrees between the ray `from -> to` and straight down.
///
/// Positive when `to` lies towards larger x. Points are given in pixels.
pub fn angle_from_vertical(from: (f32, f32), to: (f32, f32)) -> f32 {
    (to.0 - from.0).atan2(to.1 - from.1).to_degrees()
}

/// Manhattan distance in normalized coordinates
pub fn manhattan_distance(a: &Landmark, b: &Landmark) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::BodyLandmark;

    fn point(x: f32, y: f32) -> Landmark {
        Landmark::new(BodyLandmark::Nose, x, y, 1.0)
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(&point(0.3, 0.4), &point(0.3, 0.5), &point(0.4, 0.5), 100.0, 100.0);
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_straight_angle() {
        let angle = joint_angle(&point(0.3, 0.4), &point(0.3, 0.5), &point(0.3, 0.6), 100.0, 100.0);
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_angle_is_zero() {
        let p = point(0.5, 0.5);
        assert_eq!(joint_angle(&p, &p, &point(0.2, 0.2), 100.0, 100.0), 0.0);
        assert_eq!(joint_angle(&point(0.1, 0.1), &p, &point(0.2, 0.2), 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_pixel_space_respects_aspect() {
        // Equal normalized offsets, but the frame is twice as wide as tall
        let angle = joint_angle(&point(0.6, 0.5), &point(0.5, 0.5), &point(0.5, 0.4), 200.0, 100.0);
        assert!((angle - 90.0).abs() < 1e-3);
        let d = pixel_distance(&point(0.0, 0.0), &point(0.3, 0.4), 100.0, 100.0);
        assert!((d - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_from_vertical() {
        assert_eq!(angle_from_vertical((50.0, 40.0), (50.0, 60.0)), 0.0);
        assert!((angle_from_vertical((0.0, 0.0), (10.0, 10.0)) - 45.0).abs() < 1e-4);
        assert!((angle_from_vertical((0.0, 0.0), (-10.0, 10.0)) + 45.0).abs() < 1e-4);
        assert_eq!(angle_from_vertical((5.0, 5.0), (5.0, 5.0)), 0.0);
    }

    #[test]
    fn test_manhattan_distance() {
        let d = manhattan_distance(&point(0.3, 0.6), &point(0.4, 0.7));
        assert!((d - 0.2).abs() < 1e-6);
    }
}
