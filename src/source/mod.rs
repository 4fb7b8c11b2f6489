mod json_lines;

pub use json_lines::JsonLinesSource;

use crate::pose::Frame;
use anyhow::Result;

/// Trait for suppliers of detector output frames
pub trait FrameSource {
    /// Next frame in capture order, `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Drain a source into memory
pub fn read_all(source: &mut dyn FrameSource) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    while let Some(frame) = source.next_frame()? {
        frames.push(frame);
    }
    Ok(frames)
}
