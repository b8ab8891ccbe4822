use std::path::Path;

use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::defaults::{CeilQuantizer, CumulativePathBuilder};
use crate::pipeline::runtime::{DurationAligner, DurationAlignerParts};
use crate::pipeline::traits::{PathBuilder, Quantizer};

pub struct DurationAlignerBuilder {
    config: AlignerConfig,
    quantizer: Option<Box<dyn Quantizer>>,
    path_builder: Option<Box<dyn PathBuilder>>,
}

impl DurationAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            quantizer: None,
            path_builder: None,
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, AlignmentError> {
        Ok(Self::new(AlignerConfig::load(path)?))
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.config.speed = speed;
        self
    }

    pub fn with_quantizer(mut self, quantizer: Box<dyn Quantizer>) -> Self {
        self.quantizer = Some(quantizer);
        self
    }

    pub fn with_path_builder(mut self, path_builder: Box<dyn PathBuilder>) -> Self {
        self.path_builder = Some(path_builder);
        self
    }

    pub fn build(self) -> Result<DurationAligner, AlignmentError> {
        self.config.validate()?;
        tracing::debug!(
            max_tokens = self.config.max_tokens,
            max_frames = self.config.max_frames,
            speed = self.config.speed,
            "expansion: aligner configured"
        );

        Ok(DurationAligner::from_parts(DurationAlignerParts {
            config: self.config,
            quantizer: self.quantizer.unwrap_or_else(|| Box::new(CeilQuantizer)),
            path_builder: self
                .path_builder
                .unwrap_or_else(|| Box::new(CumulativePathBuilder)),
        }))
    }
}
