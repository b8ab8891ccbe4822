use crate::types::Grid;

/// 1.0 for the first `total_length_clamped` frames, 0.0 after.
pub fn output_mask(total_length_clamped: usize, max_frames: usize) -> Vec<f32> {
    (0..max_frames)
        .map(|j| if j < total_length_clamped { 1.0 } else { 0.0 })
        .collect()
}

/// Token-major outer product `validity[i] * output_mask[j]`.
pub fn token_frame_validity(validity: &[f32], output_mask: &[f32]) -> Grid<u8> {
    Grid::from_fn(validity.len(), output_mask.len(), |i, j| {
        (validity[i] * output_mask[j]) as u8
    })
}
