use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::AlignmentError;
use crate::types::{AlignmentOutput, ExpansionStatus};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub requests: Vec<RequestReport>,
    pub aggregates: AggregateReport,
}

impl Report {
    pub fn to_json_pretty(&self) -> Result<String, AlignmentError> {
        serde_json::to_string_pretty(self).map_err(|e| AlignmentError::json("serialize report", e))
    }

    /// Writes the pretty-printed report to `path`, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<(), AlignmentError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AlignmentError::io("create report directory", e))?;
        }
        let mut file =
            File::create(path).map_err(|e| AlignmentError::io("create report file", e))?;
        serde_json::to_writer_pretty(&mut file, self)
            .map_err(|e| AlignmentError::json("serialize report", e))?;
        file.write_all(b"\n")
            .map_err(|e| AlignmentError::io("finalize report file", e))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub speed: f32,
    pub length_scale: f32,
    pub max_tokens: usize,
    pub max_frames: usize,
    pub samples_per_frame: usize,
    pub sample_rate_hz: u32,
    pub request_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestReport {
    pub id: String,
    pub status: ExpansionStatus,
    pub real_token_count: u32,
    pub total_length: f32,
    pub total_length_clamped: u32,
    pub orphaned_frame_count: u32,
    pub audio_sample_count: u64,
    pub audio_duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<TokenSpan>>,
    pub notes: Vec<String>,
}

/// Frames a token covers inside the frame capacity, `[start_frame, end_frame)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenSpan {
    pub token: u32,
    pub duration: f32,
    pub start_frame: u32,
    pub end_frame: u32,
    /// Frames this token owns in the final (masked) alignment.
    pub owned_frames: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub request_count: u32,
    pub complete_count: u32,
    pub overflow_count: u32,
    pub degenerate_count: u32,
    pub orphaned_frame_total: u64,
    pub mean_total_length: f64,
    pub max_total_length: f32,
    pub audio_duration_ms_total: f64,
}

pub struct ReportContext {
    pub samples_per_frame: usize,
    pub sample_rate_hz: u32,
    pub include_spans: bool,
}

pub fn compute_request_report(
    id: &str,
    output: &AlignmentOutput,
    ctx: &ReportContext,
) -> RequestReport {
    let mut notes = Vec::new();
    let status = output.status();
    let orphaned = output.orphaned_frames();

    match status {
        ExpansionStatus::CapacityOverflow => notes.push(format!(
            "capacity_overflow:total={} capacity={}",
            output.lengths.total_length, output.lengths.capacity
        )),
        ExpansionStatus::Degenerate => notes.push("no_valid_tokens".to_string()),
        ExpansionStatus::Complete => {}
    }
    if orphaned > 0 && status != ExpansionStatus::Degenerate {
        notes.push(format!("orphaned_frames={orphaned}"));
    }

    RequestReport {
        id: id.to_string(),
        status,
        real_token_count: to_u32(output.real_token_count),
        total_length: output.lengths.total_length,
        total_length_clamped: to_u32(output.lengths.total_length_clamped),
        orphaned_frame_count: to_u32(orphaned),
        audio_sample_count: output.audio_sample_count(ctx.samples_per_frame) as u64,
        audio_duration_ms: output.audio_duration_ms(ctx.samples_per_frame, ctx.sample_rate_hz),
        spans: ctx.include_spans.then(|| token_spans(output)),
        notes,
    }
}

/// Spans of every token with a non-zero duration, in token order.
pub fn token_spans(output: &AlignmentOutput) -> Vec<TokenSpan> {
    let capacity = output.alignment.rows() as f32;
    let mut start = 0.0f32;
    let mut spans = Vec::new();
    for (i, (&duration, &end)) in output
        .duration
        .iter()
        .zip(&output.lengths.cum_duration)
        .enumerate()
    {
        if duration > 0.0 {
            let owned_frames = output.alignment.column(i).filter(|&v| v != 0.0).count();
            spans.push(TokenSpan {
                token: to_u32(i),
                duration,
                start_frame: start.min(capacity) as u32,
                end_frame: end.min(capacity) as u32,
                owned_frames: to_u32(owned_frames),
            });
        }
        start = end;
    }
    spans
}

pub fn aggregate_reports(requests: &[RequestReport]) -> AggregateReport {
    let count_status =
        |status: ExpansionStatus| to_u32(requests.iter().filter(|r| r.status == status).count());

    let mean_total_length = if requests.is_empty() {
        0.0
    } else {
        requests
            .iter()
            .map(|r| f64::from(r.total_length))
            .sum::<f64>()
            / requests.len() as f64
    };

    AggregateReport {
        request_count: to_u32(requests.len()),
        complete_count: count_status(ExpansionStatus::Complete),
        overflow_count: count_status(ExpansionStatus::CapacityOverflow),
        degenerate_count: count_status(ExpansionStatus::Degenerate),
        orphaned_frame_total: requests
            .iter()
            .map(|r| u64::from(r.orphaned_frame_count))
            .sum(),
        mean_total_length,
        max_total_length: requests
            .iter()
            .map(|r| r.total_length)
            .fold(0.0f32, f32::max),
        audio_duration_ms_total: requests.iter().map(|r| r.audio_duration_ms).sum(),
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::expand_durations;
    use crate::types::TokenSequence;

    fn ctx(include_spans: bool) -> ReportContext {
        ReportContext {
            samples_per_frame: 512,
            sample_rate_hz: 44_100,
            include_spans,
        }
    }

    #[test]
    fn spans_follow_prefix_sums() {
        let tokens = TokenSequence::padded(&[0.0, 1.0, 0.0], 4).unwrap();
        let out = expand_durations(&tokens, 1.0, 16);
        // durations: 1, ceil(e)=3, 1
        let spans = token_spans(&out);
        assert_eq!(spans.len(), 3);
        assert_eq!((spans[0].start_frame, spans[0].end_frame), (0, 1));
        assert_eq!((spans[1].start_frame, spans[1].end_frame), (1, 4));
        assert_eq!((spans[2].start_frame, spans[2].end_frame), (4, 5));
        assert_eq!(spans[1].owned_frames, 3);
    }

    #[test]
    fn spans_are_clipped_to_capacity() {
        let tokens = TokenSequence::new(vec![2.0, 2.0], vec![1.0, 1.0]).unwrap();
        let out = expand_durations(&tokens, 1.0, 2);
        let spans = token_spans(&out);
        assert_eq!((spans[0].start_frame, spans[0].end_frame), (0, 2));
        assert_eq!((spans[1].start_frame, spans[1].end_frame), (2, 2));
        assert_eq!(spans[0].owned_frames, 2);
        assert_eq!(spans[1].owned_frames, 0);
    }

    #[test]
    fn request_report_notes_overflow() {
        let tokens = TokenSequence::new(vec![2.0, 2.0], vec![1.0, 1.0]).unwrap();
        let out = expand_durations(&tokens, 1.0, 2);
        let report = compute_request_report("c", &out, &ctx(false));
        assert_eq!(report.status, ExpansionStatus::CapacityOverflow);
        assert_eq!(report.total_length_clamped, 2);
        assert_eq!(report.audio_sample_count, 1024);
        assert!(report.spans.is_none());
        assert!(report.notes[0].starts_with("capacity_overflow"));
    }

    #[test]
    fn request_report_for_degenerate_input() {
        let tokens = TokenSequence::new(vec![0.0, 0.0], vec![0.0, 0.0]).unwrap();
        let out = expand_durations(&tokens, 1.0, 4);
        let report = compute_request_report("d", &out, &ctx(true));
        assert_eq!(report.status, ExpansionStatus::Degenerate);
        assert_eq!(report.orphaned_frame_count, 1);
        assert_eq!(report.notes, vec!["no_valid_tokens".to_string()]);
        assert_eq!(report.spans, Some(Vec::new()));
    }

    #[test]
    fn aggregates_count_statuses() {
        let ok = expand_durations(&TokenSequence::padded(&[0.0; 3], 4).unwrap(), 1.0, 8);
        let over = expand_durations(
            &TokenSequence::new(vec![2.0, 2.0], vec![1.0, 1.0]).unwrap(),
            1.0,
            2,
        );
        let reports = vec![
            compute_request_report("a", &ok, &ctx(false)),
            compute_request_report("b", &over, &ctx(false)),
        ];
        let agg = aggregate_reports(&reports);
        assert_eq!(agg.request_count, 2);
        assert_eq!(agg.complete_count, 1);
        assert_eq!(agg.overflow_count, 1);
        assert_eq!(agg.degenerate_count, 0);
        assert_eq!(agg.max_total_length, 16.0);
        assert!((agg.mean_total_length - 9.5).abs() < 1e-9);
    }

    #[test]
    fn tiny_real_token_is_not_reported_as_empty() {
        let out = expand_durations(&TokenSequence::padded(&[-110.0], 2).unwrap(), 1.0, 4);
        let report = compute_request_report("tiny", &out, &ctx(false));
        assert_eq!(report.status, ExpansionStatus::Complete);
        assert_eq!(report.real_token_count, 1);
        assert!(report.notes.is_empty());
    }

    fn sample_report() -> Report {
        let out = expand_durations(&TokenSequence::padded(&[0.0, 1.0], 4).unwrap(), 1.0, 8);
        let requests = vec![compute_request_report("s1", &out, &ctx(true))];
        Report {
            schema_version: REPORT_SCHEMA_VERSION,
            meta: Meta {
                generated_at: "2026-01-01T00:00:00+00:00".to_string(),
                speed: 1.0,
                length_scale: 1.0,
                max_tokens: 4,
                max_frames: 8,
                samples_per_frame: 512,
                sample_rate_hz: 44_100,
                request_count: 1,
            },
            aggregates: aggregate_reports(&requests),
            requests,
        }
    }

    #[test]
    fn report_json_uses_snake_case_status() {
        let json = sample_report().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["requests"][0]["status"], "complete");
        assert_eq!(value["requests"][0]["spans"][1]["end_frame"], 4);
        assert_eq!(value["aggregates"]["request_count"], 1);
    }

    #[test]
    fn write_json_creates_parent_directories() {
        let dir = std::env::temp_dir().join("duration_align_report_write");
        let path = dir.join("nested").join("report.json");
        let _ = fs::remove_dir_all(&dir);
        sample_report().write_json(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(written.contains("\"id\": \"s1\""));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_json_reports_io_failure() {
        let result = sample_report().write_json(Path::new("/nonexistent-root/\0/report.json"));
        assert!(matches!(result, Err(AlignmentError::Io { .. })));
    }

    #[test]
    fn empty_aggregate_is_zeroed() {
        let agg = aggregate_reports(&[]);
        assert_eq!(agg.request_count, 0);
        assert_eq!(agg.mean_total_length, 0.0);
    }
}
