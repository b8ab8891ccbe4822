use candle_core::{Device, Tensor};

use crate::error::AlignmentError;
use crate::types::AlignmentOutput;

/// Decoder-side view of one expansion.
///
/// `attn` is `(1, 1, F_max, L_max)`, frame-major like
/// [`AlignmentOutput::alignment`]; `y_mask` is `(1, 1, F_max)`.
#[derive(Debug, Clone)]
pub struct DecoderInputs {
    pub attn: Tensor,
    pub y_mask: Tensor,
}

impl DecoderInputs {
    pub fn from_output(output: &AlignmentOutput, device: &Device) -> Result<Self, AlignmentError> {
        let frames = output.alignment.rows();
        let tokens = output.alignment.cols();

        let attn = Tensor::from_slice(output.alignment.as_slice(), (1, 1, frames, tokens), device)
            .map_err(|e| AlignmentError::runtime("attn tensor creation", e))?;
        let y_mask = Tensor::from_slice(&output.output_mask, (1, 1, frames), device)
            .map_err(|e| AlignmentError::runtime("y_mask tensor creation", e))?;

        Ok(Self { attn, y_mask })
    }
}
