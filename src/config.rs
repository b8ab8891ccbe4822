use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

/// Capacities and rate settings shared by the encoder, the expansion stage
/// and the decoder. The capacities must match the exported model graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// Token capacity (`L_max`) of the encoder outputs.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Frame capacity (`F_max`) of the decoder inputs.
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Audio samples the decoder emits per frame.
    #[serde(default = "default_samples_per_frame")]
    pub samples_per_frame: usize,
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: u32,
}

impl AlignerConfig {
    pub const DEFAULT_MAX_TOKENS: usize = 256;
    pub const DEFAULT_MAX_FRAMES: usize = 2 * Self::DEFAULT_MAX_TOKENS;
    pub const DEFAULT_SPEED: f32 = 1.0;
    pub const DEFAULT_SAMPLES_PER_FRAME: usize = 512;
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read aligner config", e))?;
        serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse aligner config", e))
    }

    /// Multiplier applied to predicted durations. Only meaningful once
    /// [`validate_speed`] has accepted `speed`.
    pub fn length_scale(&self) -> f32 {
        1.0 / self.speed
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.max_tokens == 0 {
            return Err(AlignmentError::invalid_input("max_tokens must be >= 1"));
        }
        if self.max_frames == 0 {
            return Err(AlignmentError::invalid_input("max_frames must be >= 1"));
        }
        validate_speed(self.speed)
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            max_frames: Self::DEFAULT_MAX_FRAMES,
            speed: Self::DEFAULT_SPEED,
            samples_per_frame: Self::DEFAULT_SAMPLES_PER_FRAME,
            sample_rate_hz: Self::DEFAULT_SAMPLE_RATE_HZ,
        }
    }
}

pub fn validate_speed(speed: f32) -> Result<(), AlignmentError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(AlignmentError::invalid_scale(speed))
    }
}

fn default_max_tokens() -> usize {
    AlignerConfig::DEFAULT_MAX_TOKENS
}
fn default_max_frames() -> usize {
    AlignerConfig::DEFAULT_MAX_FRAMES
}
fn default_speed() -> f32 {
    AlignerConfig::DEFAULT_SPEED
}
fn default_samples_per_frame() -> usize {
    AlignerConfig::DEFAULT_SAMPLES_PER_FRAME
}
fn default_sample_rate_hz() -> u32 {
    AlignerConfig::DEFAULT_SAMPLE_RATE_HZ
}
