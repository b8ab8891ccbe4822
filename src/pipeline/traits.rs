use crate::types::Grid;

pub trait Quantizer: Send + Sync {
    /// Whole-frame durations for every token slot, padding included.
    fn quantize(&self, log_duration: &[f32], validity: &[f32], length_scale: f32) -> Vec<f32>;
}

pub trait PathBuilder: Send + Sync {
    /// Token-major `cum_duration.len() × max_frames` assignment matrix.
    fn build_path(&self, cum_duration: &[f32], max_frames: usize) -> Grid<u8>;
}
