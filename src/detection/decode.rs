use crate::pose::{BodyLandmark, Landmark, LANDMARK_COUNT};
use ndarray::{ArrayView2, ArrayViewD, Axis, Ix2};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected pose tensor shape {0:?}, expected [n, k] or [1, n, k]")]
    Shape(Vec<usize>),

    #[error("pose tensor rows need at least x and y, got {0} columns")]
    Columns(usize),

    #[error("pose tensor rows have differing lengths")]
    Ragged,
}

/// Decode a pose model's keypoint tensor into landmarks.
///
/// # Arguments
/// * `output` - Tensor of shape `[n, k]` or `[1, n, k]`; each row is
///   `x, y[, z[, confidence]]` in model input pixels, row index = landmark id
/// * `input_size` - Model input (width, height) used to normalize coordinates
///
/// Rows past the 33-point topology are ignored and rows with non-finite
/// coordinates are dropped, which leaves those landmarks absent.
pub fn landmarks_from_tensor(
    output: ArrayViewD<'_, f32>,
    input_size: (u32, u32),
) -> Result<Vec<Landmark>, DecodeError> {
    let _span = tracing::debug_span!("decode_landmarks").entered();

    let rows: ArrayView2<'_, f32> = match output.ndim() {
        2 => output
            .into_dimensionality::<Ix2>()
            .map_err(|_| DecodeError::Ragged)?,
        3 if output.shape()[0] == 1 => output
            .index_axis_move(Axis(0), 0)
            .into_dimensionality::<Ix2>()
            .map_err(|_| DecodeError::Ragged)?,
        _ => return Err(DecodeError::Shape(output.shape().to_vec())),
    };

    let columns = rows.ncols();
    if columns < 2 {
        return Err(DecodeError::Columns(columns));
    }

    let (input_width, input_height) = (input_size.0.max(1) as f32, input_size.1.max(1) as f32);

    let landmarks = rows
        .outer_iter()
        .take(LANDMARK_COUNT)
        .enumerate()
        .filter_map(|(index, row)| {
            let id = BodyLandmark::from_index(index)?;
            let (x, y) = (row[0], row[1]);
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            let z = if columns > 2 { row[2] } else { 0.0 };
            let confidence = if columns > 3 { row[3] } else { 1.0 };
            Some(
                Landmark::new(
                    id,
                    x / input_width,
                    y / input_height,
                    if confidence.is_finite() { confidence.clamp(0.0, 1.0) } else { 0.0 },
                )
                .with_z(if z.is_finite() { z / input_width } else { 0.0 }),
            )
        })
        .collect();

    Ok(landmarks)
}

/// Build the `[n, k]` tensor view expected by [`landmarks_from_tensor`] from
/// row-major keypoint rows, as found in serialized detector output
pub fn tensor_from_rows(rows: &[Vec<f32>]) -> Result<ndarray::Array2<f32>, DecodeError> {
    let columns = rows.first().map(Vec::len).unwrap_or(0);
    if rows.iter().any(|row| row.len() != columns) {
        return Err(DecodeError::Ragged);
    }
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    ndarray::Array2::from_shape_vec((rows.len(), columns), flat).map_err(|_| DecodeError::Ragged)
}
