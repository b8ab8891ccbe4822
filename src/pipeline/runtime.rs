use std::time::Instant;

use crate::alignment::assemble::assemble_alignment;
use crate::alignment::length::accumulate_lengths;
use crate::alignment::mask::{output_mask, token_frame_validity};
use crate::config::{validate_speed, AlignerConfig};
use crate::error::AlignmentError;
use crate::pipeline::traits::{PathBuilder, Quantizer};
use crate::types::{AlignmentOutput, TokenSequence};

pub struct DurationAligner {
    config: AlignerConfig,
    quantizer: Box<dyn Quantizer>,
    path_builder: Box<dyn PathBuilder>,
}

pub(crate) struct DurationAlignerParts {
    pub config: AlignerConfig,
    pub quantizer: Box<dyn Quantizer>,
    pub path_builder: Box<dyn PathBuilder>,
}

impl DurationAligner {
    pub(crate) fn from_parts(parts: DurationAlignerParts) -> Self {
        Self {
            config: parts.config,
            quantizer: parts.quantizer,
            path_builder: parts.path_builder,
        }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn align(&self, tokens: &TokenSequence) -> Result<AlignmentOutput, AlignmentError> {
        self.align_with_speed(tokens, self.config.speed)
    }

    /// Expands `tokens` at `speed` instead of the configured speed.
    pub fn align_with_speed(
        &self,
        tokens: &TokenSequence,
        speed: f32,
    ) -> Result<AlignmentOutput, AlignmentError> {
        validate_speed(speed)?;
        self.validate_tokens(tokens)?;

        let started = Instant::now();
        let max_frames = self.config.max_frames;
        let length_scale = 1.0 / speed;

        let duration = self
            .quantizer
            .quantize(&tokens.log_duration, &tokens.validity, length_scale);
        if duration.len() != tokens.len() {
            return Err(AlignmentError::runtime(
                "quantize durations",
                format!("expected {} durations, got {}", tokens.len(), duration.len()),
            ));
        }
        if let Some(bad) = duration.iter().find(|d| d.is_nan() || **d < 0.0) {
            return Err(AlignmentError::runtime(
                "quantize durations",
                format!("duration {bad} is not a non-negative frame count"),
            ));
        }

        let lengths = accumulate_lengths(&duration, max_frames);
        let output_mask = output_mask(lengths.total_length_clamped, max_frames);
        let validity = token_frame_validity(&tokens.validity, &output_mask);

        let path = self.path_builder.build_path(&lengths.cum_duration, max_frames);
        if (path.rows(), path.cols()) != (validity.rows(), validity.cols()) {
            return Err(AlignmentError::runtime(
                "build path",
                format!(
                    "path is {}x{}, expected {}x{}",
                    path.rows(),
                    path.cols(),
                    validity.rows(),
                    validity.cols()
                ),
            ));
        }
        let alignment = assemble_alignment(&path, &validity);

        let output = AlignmentOutput {
            real_token_count: tokens.real_token_count(),
            duration,
            lengths,
            output_mask,
            path,
            alignment,
        };

        tracing::debug!(
            status = output.status().as_str(),
            real_tokens = output.real_token_count,
            total_length = output.lengths.total_length,
            total_length_clamped = output.lengths.total_length_clamped,
            orphaned_frames = output.orphaned_frames(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "expansion: alignment ready"
        );

        Ok(output)
    }

    fn validate_tokens(&self, tokens: &TokenSequence) -> Result<(), AlignmentError> {
        let max_tokens = self.config.max_tokens;
        if tokens.log_duration.len() != max_tokens || tokens.validity.len() != max_tokens {
            return Err(AlignmentError::invalid_input(format!(
                "token sequence must hold exactly {max_tokens} slots \
                 (log_duration={}, validity={})",
                tokens.log_duration.len(),
                tokens.validity.len()
            )));
        }
        if let Some(i) = tokens.validity.iter().position(|&v| v != 0.0 && v != 1.0) {
            return Err(AlignmentError::invalid_input(format!(
                "validity[{i}] = {} is not 0 or 1",
                tokens.validity[i]
            )));
        }
        if let Some(i) = tokens.log_duration.iter().position(|v| !v.is_finite()) {
            return Err(AlignmentError::invalid_input(format!(
                "log_duration[{i}] = {} is not finite",
                tokens.log_duration[i]
            )));
        }
        Ok(())
    }
}
