use duration_align::Report;

pub fn print_summary(report: &Report) {
    for line in summary_lines(report) {
        println!("{line}");
    }
}

fn summary_lines(report: &Report) -> Vec<String> {
    let meta = &report.meta;
    let mut lines = Vec::with_capacity(report.requests.len() + 3);
    lines.push(format!(
        "speed={} length_scale={:.3} capacity={}x{}",
        meta.speed, meta.length_scale, meta.max_tokens, meta.max_frames
    ));

    for request in &report.requests {
        let mut line = format!(
            "{:<24} {:<17} tokens={:<4} frames={:<4}/{:<6} audio={:.1}ms",
            request.id,
            request.status.as_str(),
            request.real_token_count,
            request.total_length_clamped,
            request.total_length,
            request.audio_duration_ms
        );
        if request.orphaned_frame_count > 0 {
            line.push_str(&format!(" orphaned={}", request.orphaned_frame_count));
        }
        lines.push(line);
    }

    let agg = &report.aggregates;
    lines.push(format!(
        "requests={} complete={} overflow={} degenerate={} orphaned_frames={}",
        agg.request_count,
        agg.complete_count,
        agg.overflow_count,
        agg.degenerate_count,
        agg.orphaned_frame_total
    ));
    lines.push(format!(
        "mean_total_length={:.2} max_total_length={} audio_total={:.1}ms",
        agg.mean_total_length, agg.max_total_length, agg.audio_duration_ms_total
    ));
    lines
}
