//! Tone stage: one-pole low-pass blended with the unfiltered signal.
//!
//! ```text
//! alpha  = 0.3 + 0.7 * tone
//! y[n]   = alpha * x[n] + (1 - alpha) * y[n-1]
//! out[n] = tone * x[n] + (1 - tone) * y[n]
//! ```
//!
//! `tone = 1` is a pass-through; `tone = 0` is the darkest setting (the
//! filter at its lowest cutoff, fully blended in).
//!
//! The filter memory belongs to one [`ToneFilter`] value. The processor keeps
//! one per channel, so channels never bleed into each other.

use crate::math::flush_denormal;

/// One-pole tone filter with explicit per-channel memory.
///
/// # Invariants
///
/// - `state` is a convex combination of past inputs, so `|state|` never
///   exceeds the largest input magnitude seen since the last reset
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone, Default)]
pub struct ToneFilter {
    state: f32,
}

impl ToneFilter {
    /// Create a filter with cleared memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one sample with the given tone control in \[0.0, 1.0\].
    #[inline]
    pub fn process(&mut self, input: f32, tone: f32) -> f32 {
        let alpha = 0.3 + 0.7 * tone;
        self.state = flush_denormal(alpha * input + (1.0 - alpha) * self.state);
        let damping = 1.0 - tone;
        (1.0 - damping) * input + damping * self.state
    }

    /// Current filter memory.
    pub fn state(&self) -> f32 {
        self.state
    }

    /// Clear filter memory.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
