use super::FrameSource;
use crate::detection::{landmarks_from_tensor, tensor_from_rows};
use crate::pose::Frame;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Raw keypoint rows as written by a detector, row index = landmark id
#[derive(Debug, Deserialize)]
struct RawDetection {
    index: u32,
    timestamp_ms: u64,
    width: u32,
    height: u32,
    /// Model input size the keypoints are expressed in; absent when already normalized
    input_width: Option<u32>,
    input_height: Option<u32>,
    keypoints: Vec<Vec<f32>>,
}

/// Reads one frame per line of JSON.
///
/// A line is either a [`Frame`] with `landmarks`, or raw detector output
/// with `keypoints` rows. Blank lines are skipped.
pub struct JsonLinesSource<R: BufRead = BufReader<File>> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl JsonLinesSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Reading frames from {}", path.display());
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Pick the line shape by its `keypoints` key so errors name the offending field
    fn decode(&self, line: &str) -> Result<Frame> {
        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", self.line_number))?;

        if value.get("keypoints").is_none() {
            return serde_json::from_value(value)
                .with_context(|| format!("Invalid frame on line {}", self.line_number));
        }

        let raw: RawDetection = serde_json::from_value(value)
            .with_context(|| format!("Invalid detector record on line {}", self.line_number))?;
        if raw.keypoints.is_empty() {
            return Ok(Frame::empty(raw.index, raw.timestamp_ms, raw.width, raw.height));
        }
        let tensor = tensor_from_rows(&raw.keypoints)
            .with_context(|| format!("Bad keypoints on line {}", self.line_number))?;
        let input_size = (raw.input_width.unwrap_or(1), raw.input_height.unwrap_or(1));
        let landmarks = landmarks_from_tensor(tensor.view().into_dyn(), input_size)
            .with_context(|| format!("Bad keypoints on line {}", self.line_number))?;
        Ok(Frame::new(raw.index, raw.timestamp_ms, raw.width, raw.height, landmarks))
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_line(&mut self.buffer)
                .context("Failed to read frame line")?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.buffer.trim();
            if trimmed.is_empty() {
                continue;
            }

            return self.decode(trimmed).map(Some);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::BodyLandmark;
    use crate::source::read_all;
    use std::io::Cursor;

    #[test]
    fn test_reads_both_line_shapes() {
        let input = r#"{"index":0,"timestamp_ms":0,"width":640,"height":480,"landmarks":[{"id":0,"x":0.5,"y":0.1,"confidence":0.9}]}

{"index":1,"timestamp_ms":33,"width":640,"height":480,"input_width":256,"input_height":256,"keypoints":[[128,25.6,0,0.8],[100,30,0,0.7]]}
"#;
        let mut source = JsonLinesSource::from_reader(Cursor::new(input));
        let frames = read_all(&mut source).unwrap();
        assert_eq!(frames.len(), 2);

        assert_eq!(frames[0].landmarks[0].id, BodyLandmark::Nose);

        let raw = &frames[1];
        assert_eq!(raw.index, 1);
        assert_eq!(raw.landmarks.len(), 2);
        assert!((raw.landmarks[0].x - 0.5).abs() < 1e-6);
        assert!((raw.landmarks[0].y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_empty_keypoints_is_empty_frame() {
        let input = r#"{"index":4,"timestamp_ms":132,"width":640,"height":480,"keypoints":[]}"#;
        let mut source = JsonLinesSource::from_reader(Cursor::new(input));
        let frame = source.next_frame().unwrap().unwrap();
        assert!(frame.landmarks.is_empty());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_error_names_line() {
        let input = "{\"index\":0,\"timestamp_ms\":0,\"width\":1,\"height\":1}\nnot json\n";
        let mut source = JsonLinesSource::from_reader(Cursor::new(input));
        assert!(source.next_frame().unwrap().is_some());
        let err = source.next_frame().unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_error_keeps_field_cause() {
        let frame_line = r#"{"index":0,"timestamp_ms":0,"width":640,"height":480,"landmarks":[{"id":99,"x":0.5,"y":0.1,"confidence":0.9}]}"#;
        let err = JsonLinesSource::from_reader(Cursor::new(frame_line))
            .next_frame()
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid frame on line 1"));
        assert!(message.contains("landmark id 99"));

        let raw_line = r#"{"index":0,"timestamp_ms":0,"width":640,"keypoints":[[1.0,2.0]]}"#;
        let err = JsonLinesSource::from_reader(Cursor::new(raw_line))
            .next_frame()
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid detector record on line 1"));
        assert!(message.contains("height"));
    }
}
