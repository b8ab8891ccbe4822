/// Turns predicted log-durations into whole frame counts per token.
///
/// `duration[i] = ceil(exp(log_duration[i]) * validity[i] * length_scale)`.
/// Padding slots (`validity == 0`) are always 0, even when their
/// log-duration would overflow `exp`. `length_scale` must already be
/// known to be positive.
///
/// The product is taken in f64 so real tokens keep at least one frame down
/// to `exp` underflow (log-durations around -745).
pub fn quantize_durations(log_duration: &[f32], validity: &[f32], length_scale: f32) -> Vec<f32> {
    log_duration
        .iter()
        .zip(validity)
        .map(|(&log_d, &valid)| {
            if valid == 0.0 {
                return 0.0;
            }
            let frames = f64::from(log_d).exp() * f64::from(valid) * f64::from(length_scale);
            frames.ceil() as f32
        })
        .collect()
}
