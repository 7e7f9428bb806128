//! Envelope follower driven by the attack control.
//!
//! Tracks the smoothed absolute level of the input for metering and any
//! level-dependent behaviour layered on top of the processor.

use crate::math::flush_denormal;

/// Exponentially smoothed absolute level.
///
/// The smoothing rate comes from the normalized attack control:
///
/// ```text
/// rate = 0.1 + 0.9 * attack
/// env  = env * (1 - rate) + |x| * rate
/// ```
///
/// `attack = 1` follows the input almost instantly, `attack = 0` is the
/// slowest response.
///
/// # Example
///
/// ```rust
/// use crunch_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new();
/// env.set_attack(0.5);
/// let level = env.process(-0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    rate: f32,
}

impl EnvelopeFollower {
    /// Create a follower at zero level with the default attack (0.5).
    pub fn new() -> Self {
        let mut follower = Self {
            envelope: 0.0,
            rate: 0.0,
        };
        follower.set_attack(0.5);
        follower
    }

    /// Set the attack control in \[0.0, 1.0\].
    #[inline]
    pub fn set_attack(&mut self, attack: f32) {
        self.rate = 0.1 + 0.9 * crate::math::clamp_unit(attack);
    }

    /// Feed one sample and return the updated level (always non-negative).
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.envelope =
            flush_denormal(self.envelope * (1.0 - self.rate) + input.abs() * self.rate);
        self.envelope
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the level to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new()
    }
}
