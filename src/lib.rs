pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::expand_durations;
pub use alignment::length::LengthSummary;
pub use alignment::report::{
    aggregate_reports, compute_request_report, token_spans, AggregateReport, Meta, Report,
    ReportContext, RequestReport, TokenSpan, REPORT_SCHEMA_VERSION,
};
pub use config::AlignerConfig;
pub use error::AlignmentError;
pub use pipeline::builder::DurationAlignerBuilder;
pub use pipeline::runtime::DurationAligner;
pub use pipeline::tensor::DecoderInputs;
pub use pipeline::traits::{PathBuilder, Quantizer};
pub use types::{AlignmentOutput, ExpansionStatus, Grid, TokenSequence};
