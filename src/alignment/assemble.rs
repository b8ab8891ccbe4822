use crate::types::Grid;

/// Masks the token-major path and flips it to the frame-major layout the
/// decoder reads: `alignment[j][i] = path[i][j] * validity[i][j]`.
pub fn assemble_alignment(path: &Grid<u8>, token_frame_validity: &Grid<u8>) -> Grid<f32> {
    path.zip_map(token_frame_validity, |p, v| f32::from(p * v))
        .transpose()
}
