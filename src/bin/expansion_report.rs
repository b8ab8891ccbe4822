use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use duration_align::{
    aggregate_reports, compute_request_report, AlignerConfig, DurationAligner,
    DurationAlignerBuilder, Meta, Report, ReportContext, RequestReport, TokenSequence,
    REPORT_SCHEMA_VERSION,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[path = "expansion_report/summary_report_formatter.rs"]
mod summary_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    /// One line per request plus aggregates, printed to stdout.
    Summary,
}

#[derive(Debug, Parser)]
#[command(name = "expansion_report")]
#[command(about = "Expand predicted token durations into decoder alignments and report on them")]
struct Args {
    /// JSON file holding one request object or an array of them.
    #[arg(long, env = "DURATION_ALIGN_INPUT")]
    input: PathBuf,
    #[arg(long, env = "DURATION_ALIGN_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides the configured speed.
    #[arg(long, env = "DURATION_ALIGN_SPEED")]
    speed: Option<f32>,
    #[arg(long, env = "DURATION_ALIGN_OUT")]
    out: Option<PathBuf>,
    #[arg(long, env = "DURATION_ALIGN_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "DURATION_ALIGN_OFFSET", default_value_t = 0)]
    offset: usize,
    #[arg(long, env = "DURATION_ALIGN_INCLUDE_SPANS", default_value_t = false)]
    include_spans: bool,
    #[arg(
        long,
        env = "DURATION_ALIGN_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    format: OutputFormat,
}

#[derive(Debug, Deserialize)]
struct RequestInput {
    id: String,
    log_duration: Vec<f32>,
    /// Omitted when `log_duration` lists only the real tokens.
    #[serde(default)]
    validity: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputFile {
    Many(Vec<RequestInput>),
    One(RequestInput),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("expansion_report: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let mut config = match args.config.as_ref() {
        Some(path) => AlignerConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => AlignerConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    let aligner = DurationAlignerBuilder::new(config)
        .build()
        .map_err(|err| format!("Invalid aligner configuration: {err}"))?;

    let mut requests = load_requests(&args.input)?;
    if args.offset > 0 {
        requests = requests.into_iter().skip(args.offset).collect();
    }
    if let Some(limit) = args.limit {
        requests.truncate(limit);
    }
    if requests.is_empty() {
        return Err("No requests selected after applying offset/limit.".to_string());
    }

    let ctx = ReportContext {
        samples_per_frame: aligner.config().samples_per_frame,
        sample_rate_hz: aligner.config().sample_rate_hz,
        include_spans: args.include_spans,
    };
    let request_reports = requests
        .iter()
        .map(|request| run_request(&aligner, request, &ctx))
        .collect::<Result<Vec<_>, _>>()?;

    let config = aligner.config();
    let report = Report {
        schema_version: REPORT_SCHEMA_VERSION,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            speed: config.speed,
            length_scale: config.length_scale(),
            max_tokens: config.max_tokens,
            max_frames: config.max_frames,
            samples_per_frame: config.samples_per_frame,
            sample_rate_hz: config.sample_rate_hz,
            request_count: request_reports.len(),
        },
        aggregates: aggregate_reports(&request_reports),
        requests: request_reports,
    };

    match args.format {
        OutputFormat::Json => match args.out.as_ref() {
            Some(path) => {
                report
                    .write_json(path)
                    .map_err(|err| format!("Failed to write report '{}': {err}", path.display()))?;
                tracing::info!(path = %path.display(), "report written");
            }
            None => {
                let json = report.to_json_pretty().map_err(|err| err.to_string())?;
                println!("{json}");
            }
        },
        OutputFormat::Summary => summary_report_formatter::print_summary(&report),
    }
    Ok(())
}

fn run_request(
    aligner: &DurationAligner,
    request: &RequestInput,
    ctx: &ReportContext,
) -> Result<RequestReport, String> {
    let capacity = aligner.config().max_tokens;
    let tokens = match request.validity.as_ref() {
        Some(validity) => TokenSequence::new(request.log_duration.clone(), validity.clone()),
        None => TokenSequence::padded(&request.log_duration, capacity),
    }
    .map_err(|err| format!("{}: {err}", request.id))?;

    let output = aligner
        .align(&tokens)
        .map_err(|err| format!("{}: align() failed: {err}", request.id))?;
    Ok(compute_request_report(&request.id, &output, ctx))
}

fn load_requests(path: &Path) -> Result<Vec<RequestInput>, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read input '{}': {err}", path.display()))?;
    let parsed: InputFile = serde_json::from_str(&data)
        .map_err(|err| format!("Failed to parse input '{}': {err}", path.display()))?;
    Ok(match parsed {
        InputFile::Many(requests) => requests,
        InputFile::One(request) => vec![request],
    })
}
