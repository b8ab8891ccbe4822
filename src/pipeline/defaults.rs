use crate::alignment::duration::quantize_durations;
use crate::alignment::path::expand_path;
use crate::pipeline::traits::{PathBuilder, Quantizer};
use crate::types::Grid;

pub struct CeilQuantizer;

impl Quantizer for CeilQuantizer {
    fn quantize(&self, log_duration: &[f32], validity: &[f32], length_scale: f32) -> Vec<f32> {
        quantize_durations(log_duration, validity, length_scale)
    }
}

pub struct CumulativePathBuilder;

impl PathBuilder for CumulativePathBuilder {
    fn build_path(&self, cum_duration: &[f32], max_frames: usize) -> Grid<u8> {
        expand_path(cum_duration, max_frames)
    }
}
