//! Duration-driven monotonic expansion of token sequences into frames.
//!
//! Stages run in a fixed order:
//! `log_duration -> duration -> cum_duration/total -> masks -> path -> alignment`.

pub mod assemble;
pub mod duration;
pub mod length;
pub mod mask;
pub mod path;
pub mod report;

use crate::types::{AlignmentOutput, TokenSequence};

/// Runs every stage with the stock implementations. The caller guarantees
/// `length_scale > 0`.
pub fn expand_durations(
    tokens: &TokenSequence,
    length_scale: f32,
    max_frames: usize,
) -> AlignmentOutput {
    let duration =
        duration::quantize_durations(&tokens.log_duration, &tokens.validity, length_scale);
    let lengths = length::accumulate_lengths(&duration, max_frames);
    let output_mask = mask::output_mask(lengths.total_length_clamped, max_frames);
    let validity = mask::token_frame_validity(&tokens.validity, &output_mask);
    let path = path::expand_path(&lengths.cum_duration, max_frames);
    let alignment = assemble::assemble_alignment(&path, &validity);

    AlignmentOutput {
        real_token_count: tokens.real_token_count(),
        duration,
        lengths,
        output_mask,
        path,
        alignment,
    }
}
