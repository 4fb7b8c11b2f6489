use crate::pose::{BodyLandmark as L, Frame};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::path::Path;

/// Width of rendered thumbnails; height follows the frame's aspect ratio
pub const THUMBNAIL_WIDTH: u32 = 320;

/// Tallest thumbnail rendered, whatever the frame's aspect ratio
pub const MAX_THUMBNAIL_HEIGHT: u32 = THUMBNAIL_WIDTH * 4;

const BACKGROUND: Rgb<u8> = Rgb([24, 24, 24]);
const JOINT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BONE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const LOW_CONFIDENCE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Bones drawn between landmarks (start, end)
const SKELETON: [(L, L); 20] = [
    // Head
    (L::LeftEar, L::LeftEye),
    (L::LeftEye, L::Nose),
    (L::Nose, L::RightEye),
    (L::RightEye, L::RightEar),
    // Arms
    (L::LeftShoulder, L::RightShoulder),
    (L::LeftShoulder, L::LeftElbow),
    (L::LeftElbow, L::LeftWrist),
    (L::LeftWrist, L::LeftIndex),
    (L::RightShoulder, L::RightElbow),
    (L::RightElbow, L::RightWrist),
    (L::RightWrist, L::RightIndex),
    // Torso
    (L::LeftShoulder, L::LeftHip),
    (L::RightShoulder, L::RightHip),
    (L::LeftHip, L::RightHip),
    // Legs
    (L::LeftHip, L::LeftKnee),
    (L::LeftKnee, L::LeftAnkle),
    (L::LeftAnkle, L::LeftFootIndex),
    (L::RightHip, L::RightKnee),
    (L::RightKnee, L::RightAnkle),
    (L::RightAnkle, L::RightFootIndex),
];

/// Draw the skeleton of a frame on a plain background
pub fn render_skeleton(frame: &Frame) -> RgbImage {
    let _span = tracing::debug_span!("render_skeleton", frame = frame.index).entered();

    let width = THUMBNAIL_WIDTH;
    let height = if frame.width == 0 || frame.height == 0 {
        THUMBNAIL_WIDTH
    } else {
        ((THUMBNAIL_WIDTH as u64 * frame.height as u64) / frame.width as u64)
            .clamp(1, MAX_THUMBNAIL_HEIGHT as u64) as u32
    };
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);

    let to_canvas = |x: f32, y: f32| (x * width as f32, y * height as f32);

    for (a, b) in SKELETON {
        if let Some((a, b)) = frame.pair(a, b) {
            draw_line(&mut image, to_canvas(a.x, a.y), to_canvas(b.x, b.y), BONE_COLOR);
        }
    }

    for landmark in &frame.landmarks {
        let color = if landmark.is_visible() {
            JOINT_COLOR
        } else {
            LOW_CONFIDENCE_COLOR
        };
        draw_dot(&mut image, to_canvas(landmark.x, landmark.y), color);
    }

    image
}

/// Render a frame's skeleton and write it as an image file
pub fn save_thumbnail<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    render_skeleton(frame)
        .save(path)
        .with_context(|| format!("Failed to write thumbnail {}", path.display()))?;
    tracing::debug!("Thumbnail written to {}", path.display());
    Ok(())
}

fn put(image: &mut RgbImage, x: f32, y: f32, color: Rgb<u8>) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, color);
    }
}

/// Liang-Barsky clip of a segment to `[0, width] x [0, height]`
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    height: f32,
) -> Option<((f32, f32), (f32, f32))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [(-dx, from.0), (dx, width - from.0), (-dy, from.1), (dy, height - from.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

fn draw_line(image: &mut RgbImage, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
    // Only the visible part is walked, so far-off landmarks cost no more than the canvas
    let Some((from, to)) = clip_segment(from, to, image.width() as f32, image.height() as f32) else {
        return;
    };
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        put(image, from.0 + dx * t, from.1 + dy * t, color);
    }
}

fn draw_dot(image: &mut RgbImage, center: (f32, f32), color: Rgb<u8>) {
    for oy in -1..=1 {
        for ox in -1..=1 {
            put(image, center.0 + ox as f32, center.1 + oy as f32, color);
        }
    }
}
