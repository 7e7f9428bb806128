//! Small numeric helpers shared by the shaping stages and the processor.
//!
//! All functions are allocation-free and safe to call from the audio thread.

/// Clamp a normalized control value to \[0.0, 1.0\].
///
/// NaN maps to 0.0 so that a garbage automation value can never leak into
/// the signal path.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Flush denormal values to zero.
///
/// Feedback state (the tone filter memory, the envelope) decays toward zero
/// indefinitely on silence; subnormal floats are an order of magnitude slower
/// on most CPUs.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Loudness-compensated wet/dry blend.
///
/// ```text
/// wet_gain = wet * output
/// dry_gain = dry * (1 - mix * 0.5)
/// result   = dry_gain * (1 - mix) + wet_gain * mix
/// ```
///
/// The dry path is attenuated by `1 - mix/2` on top of the crossfade, so the
/// curve is not a linear crossfade. At `mix = 0` the result is exactly `dry`;
/// at `mix = 1` it is exactly `wet * output`.
#[inline]
pub fn compensated_mix(dry: f32, wet: f32, output: f32, mix: f32) -> f32 {
    let wet_gain = wet * output;
    let dry_gain = dry * (1.0 - mix * 0.5);
    dry_gain * (1.0 - mix) + wet_gain * mix
}

/// Absolute peak of a buffer.
#[inline]
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}
