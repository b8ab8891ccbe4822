/// Prefix sums of the quantized durations and the frame count derived
/// from them.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthSummary {
    /// Inclusive prefix sums; the last entry is the unclamped total.
    pub cum_duration: Vec<f32>,
    pub total_length: f32,
    /// `clamp(total_length, 1, capacity)`.
    pub total_length_clamped: usize,
    /// Set when `total_length` exceeded `capacity`.
    pub overflow: bool,
    pub capacity: usize,
}

pub fn accumulate_lengths(duration: &[f32], max_frames: usize) -> LengthSummary {
    let cum_duration: Vec<f32> = duration
        .iter()
        .scan(0.0f32, |acc, &d| {
            *acc += d;
            Some(*acc)
        })
        .collect();
    let total_length = cum_duration.last().copied().unwrap_or(0.0);

    let overflow = total_length > max_frames as f32;
    let total_length_clamped = if overflow {
        tracing::warn!(
            total_length,
            capacity = max_frames,
            "predicted length exceeds frame capacity; clamping"
        );
        max_frames
    } else {
        total_length.max(1.0) as usize
    };

    LengthSummary {
        cum_duration,
        total_length,
        total_length_clamped,
        overflow,
        capacity: max_frames,
    }
}
