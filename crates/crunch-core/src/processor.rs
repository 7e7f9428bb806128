//! Block processor: parameter snapshot, shaping chain, oversampling, mix.
//!
//! ```text
//! in ─┬─────────────────────────────────────────────┐ dry
//!     └─[2x up]─ variant ─ depth ─ tone ─[2x down]──┴─ mix ─ out
//!        (only when oversampling is on)
//! ```
//!
//! [`SignalProcessor::process`] runs once per audio block on the real-time
//! thread. It never allocates, locks or blocks: every buffer is sized in
//! [`SignalProcessor::initialize`], and parameters arrive through atomics
//! written by a [`ParameterHandle`] on the control thread.

use std::sync::Arc;

use crate::envelope::EnvelopeFollower;
use crate::error::ProcessError;
use crate::math::{compensated_mix, peak};
use crate::oversample::{KERNEL_LEN, OVERSAMPLE_FACTOR, Oversampler};
use crate::param::{EffectParameters, ParamId, ParameterHandle, SharedParameters};
use crate::tone::ToneFilter;
use crate::transfer::{DistortionVariant, depth};

/// Channel count used by [`SignalProcessor::default`].
pub const DEFAULT_CHANNELS: usize = 2;

/// The distortion effect's per-block audio transform.
///
/// Lifecycle: [`new`](Self::new) → [`initialize`](Self::initialize) →
/// [`process`](Self::process) any number of times, with
/// [`reset`](Self::reset) or re-initialization in between as needed.
/// `initialize` and `reset` allocate or touch every buffer and must not run
/// concurrently with `process`.
///
/// Each channel owns its tone filter memory and oversampler history, so
/// channels are processed independently.
///
/// # Example
///
/// ```rust
/// use crunch_core::{DistortionVariant, ParamId, SignalProcessor};
///
/// let mut processor = SignalProcessor::new(2);
/// processor.initialize(48000.0, 256).unwrap();
/// processor.set_variant(DistortionVariant::Fuzz);
/// processor.set_param(ParamId::Drive, 0.8);
///
/// let mut left = [0.25f32; 256];
/// let mut right = [-0.25f32; 256];
/// processor.process(&mut [&mut left[..], &mut right[..]]).unwrap();
/// assert!(left.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug)]
pub struct SignalProcessor {
    shared: Arc<SharedParameters>,
    max_channels: usize,
    sample_rate: f32,
    max_block_size: usize,
    initialized: bool,

    dry: Vec<f32>,
    wet: Vec<f32>,
    /// Oversampled working buffer, `max_block_size * OVERSAMPLE_FACTOR`
    work: Vec<f32>,

    tone: Vec<ToneFilter>,
    oversamplers: Vec<Oversampler>,
    envelope: EnvelopeFollower,

    /// Oversampling mode used by the previous block
    was_oversampling: bool,
    input_peak: f32,
    output_peak: f32,
    non_finite: u64,
}

impl SignalProcessor {
    /// Create an uninitialized processor for up to `max_channels` channels.
    ///
    /// A zero channel count is raised to one.
    pub fn new(max_channels: usize) -> Self {
        Self {
            shared: Arc::new(SharedParameters::default()),
            max_channels: max_channels.max(1),
            sample_rate: 0.0,
            max_block_size: 0,
            initialized: false,
            dry: Vec::new(),
            wet: Vec::new(),
            work: Vec::new(),
            tone: Vec::new(),
            oversamplers: Vec::new(),
            envelope: EnvelopeFollower::new(),
            was_oversampling: false,
            input_peak: 0.0,
            output_peak: 0.0,
            non_finite: 0,
        }
    }

    /// Size every buffer, build the per-channel oversamplers and reset all
    /// state. Parameters are kept.
    ///
    /// Not real-time safe.
    pub fn initialize(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), ProcessError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ProcessError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(ProcessError::InvalidBlockSize);
        }

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.dry = vec![0.0; max_block_size];
        self.wet = vec![0.0; max_block_size];
        self.work = vec![0.0; max_block_size * OVERSAMPLE_FACTOR];
        self.tone = vec![ToneFilter::new(); self.max_channels];
        self.oversamplers = vec![Oversampler::new(sample_rate); self.max_channels];
        self.was_oversampling = self.shared.is_oversampling();
        self.initialized = true;
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            max_block_size,
            channels = self.max_channels,
            "processor initialized"
        );
        Ok(())
    }

    /// Clear buffers, filter memory, oversampler history, envelope and
    /// meters. Parameters and variant are untouched.
    pub fn reset(&mut self) {
        self.dry.fill(0.0);
        self.wet.fill(0.0);
        self.work.fill(0.0);
        self.tone.iter_mut().for_each(ToneFilter::reset);
        self.oversamplers.iter_mut().for_each(Oversampler::reset);
        self.envelope.reset();
        self.input_peak = 0.0;
        self.output_peak = 0.0;

        #[cfg(feature = "tracing")]
        tracing::debug!("processor reset");
    }

    /// Process one block in place, one slice per channel.
    ///
    /// All channels must have the same length, at most the `max_block_size`
    /// given to [`initialize`](Self::initialize). An empty channel list or
    /// zero-length block is a no-op.
    ///
    /// Non-finite samples out of the shaping chain are flushed to zero and
    /// counted in [`non_finite_count`](Self::non_finite_count).
    pub fn process(&mut self, channels: &mut [&mut [f32]]) -> Result<(), ProcessError> {
        if !self.initialized {
            return Err(ProcessError::NotInitialized);
        }
        let Some(first) = channels.first() else {
            return Ok(());
        };
        let len = first.len();
        if channels.len() > self.max_channels {
            return Err(ProcessError::TooManyChannels {
                got: channels.len(),
                max: self.max_channels,
            });
        }
        if let Some(bad) = channels.iter().find(|ch| ch.len() != len) {
            return Err(ProcessError::ChannelLengthMismatch {
                expected: len,
                got: bad.len(),
            });
        }
        if len > self.max_block_size {
            return Err(ProcessError::BlockTooLarge {
                len,
                max: self.max_block_size,
            });
        }
        if len == 0 {
            return Ok(());
        }

        let params = self.shared.snapshot();

        if params.oversample != self.was_oversampling {
            self.oversamplers.iter_mut().for_each(Oversampler::reset);
            self.was_oversampling = params.oversample;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                oversampling = params.oversample,
                latency = self.latency(),
                "oversampling mode changed"
            );
        }

        self.envelope.set_attack(params.attack);
        for i in 0..len {
            let frame_peak = channels.iter().fold(0.0f32, |acc, ch| acc.max(ch[i].abs()));
            self.envelope.process(frame_peak);
        }

        let mut input_peak = 0.0f32;
        let mut output_peak = 0.0f32;
        let mut flushed = 0u32;

        for (ch, channel) in channels.iter_mut().enumerate() {
            let dry = &mut self.dry[..len];
            let wet = &mut self.wet[..len];
            let tone = &mut self.tone[ch];

            dry.copy_from_slice(channel);
            input_peak = input_peak.max(peak(dry));

            if params.oversample {
                let work = &mut self.work[..len * OVERSAMPLE_FACTOR];
                let oversampler = &mut self.oversamplers[ch];
                oversampler.upsample(dry, work);
                for sample in work.iter_mut() {
                    *sample = shape_chain(&params, tone, *sample, &mut flushed);
                }
                oversampler.downsample(work, wet);
            } else {
                for (w, &d) in wet.iter_mut().zip(dry.iter()) {
                    *w = shape_chain(&params, tone, d, &mut flushed);
                }
            }

            for ((out, &d), &w) in channel.iter_mut().zip(dry.iter()).zip(wet.iter()) {
                *out = compensated_mix(d, w, params.output, params.mix);
            }
            output_peak = output_peak.max(peak(channel));
        }

        self.input_peak = input_peak;
        self.output_peak = output_peak;

        if flushed > 0 {
            self.non_finite += u64::from(flushed);

            #[cfg(feature = "tracing")]
            tracing::warn!(
                flushed,
                total = self.non_finite,
                "non-finite samples flushed to zero"
            );
        }

        Ok(())
    }

    /// Write a parameter. Continuous values are clamped to \[0.0, 1.0\];
    /// `Oversample` is on when `value >= 0.5`.
    pub fn set_param(&self, id: ParamId, value: f32) {
        self.shared.set(id, value);
    }

    /// Read a parameter as a normalized value.
    pub fn get_param(&self, id: ParamId) -> f32 {
        self.shared.get(id)
    }

    /// Select the distortion voice.
    pub fn set_variant(&self, variant: DistortionVariant) {
        self.shared.set_variant(variant);
    }

    /// Current distortion voice.
    pub fn variant(&self) -> DistortionVariant {
        self.shared.variant()
    }

    /// Enable or disable 2x oversampling. Takes effect at the next block.
    pub fn set_oversampling(&self, enabled: bool) {
        self.shared.set_oversampling(enabled);
    }

    /// Whether 2x oversampling is enabled.
    pub fn is_oversampling(&self) -> bool {
        self.shared.is_oversampling()
    }

    /// Latency in samples for the current mode: 8 when oversampling, else 0.
    ///
    /// Hosts must query this again after every oversampling change.
    pub fn latency(&self) -> usize {
        if self.is_oversampling() { KERNEL_LEN / 2 } else { 0 }
    }

    /// Control-thread handle sharing this processor's parameters.
    pub fn handle(&self) -> ParameterHandle {
        ParameterHandle::new(Arc::clone(&self.shared))
    }

    /// Snapshot of every parameter.
    pub fn parameters(&self) -> EffectParameters {
        self.shared.snapshot()
    }

    /// Write every field of `params` (clamped).
    pub fn apply_parameters(&self, params: &EffectParameters) {
        self.shared.store(params);
    }

    /// Smoothed input level.
    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    /// Absolute input peak of the last block.
    pub fn input_peak(&self) -> f32 {
        self.input_peak
    }

    /// Absolute output peak of the last block.
    pub fn output_peak(&self) -> f32 {
        self.output_peak
    }

    /// Non-finite samples flushed since construction.
    pub fn non_finite_count(&self) -> u64 {
        self.non_finite
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Sample rate given to `initialize` (0 before).
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Maximum block size given to `initialize` (0 before).
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Maximum channel count.
    pub fn max_channels(&self) -> usize {
        self.max_channels
    }
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS)
    }
}

/// Variant → depth → tone for one sample.
#[inline]
fn shape_chain(params: &EffectParameters, tone: &mut ToneFilter, x: f32, flushed: &mut u32) -> f32 {
    let mut shaped = depth(params.variant.shape(x, params.drive), params.depth);
    if !shaped.is_finite() {
        // Flush before the tone filter so its memory stays finite.
        shaped = 0.0;
        *flushed += 1;
    }
    tone.process(shaped, params.tone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::{distortion, fuzz};

    fn ready(channels: usize, block: usize) -> SignalProcessor {
        let mut p = SignalProcessor::new(channels);
        p.initialize(48000.0, block).unwrap();
        p
    }

    #[test]
    fn process_before_initialize_fails() {
        let mut p = SignalProcessor::default();
        let mut buf = [0.0f32; 4];
        assert_eq!(
            p.process(&mut [&mut buf[..]]),
            Err(ProcessError::NotInitialized)
        );
        assert!(!p.is_initialized());
    }

    #[test]
    fn initialize_rejects_bad_arguments() {
        let mut p = SignalProcessor::default();
        assert_eq!(
            p.initialize(0.0, 64),
            Err(ProcessError::InvalidSampleRate(0.0))
        );
        assert!(matches!(
            p.initialize(f32::NAN, 64),
            Err(ProcessError::InvalidSampleRate(_))
        ));
        assert_eq!(p.initialize(48000.0, 0), Err(ProcessError::InvalidBlockSize));
        assert!(!p.is_initialized());
    }

    #[test]
    fn buffers_sized_at_initialize() {
        let p = ready(2, 128);
        assert_eq!(p.dry.len(), 128);
        assert_eq!(p.wet.len(), 128);
        assert_eq!(p.work.len(), 256);
        assert_eq!(p.tone.len(), 2);
        assert_eq!(p.oversamplers.len(), 2);
    }

    #[test]
    fn rejects_host_misuse() {
        let mut p = ready(1, 8);
        let mut a = [0.0f32; 8];
        let mut b = [0.0f32; 8];
        assert_eq!(
            p.process(&mut [&mut a[..], &mut b[..]]),
            Err(ProcessError::TooManyChannels { got: 2, max: 1 })
        );

        let mut p = ready(2, 8);
        let mut long = [0.0f32; 9];
        assert_eq!(
            p.process(&mut [&mut long[..]]),
            Err(ProcessError::BlockTooLarge { len: 9, max: 8 })
        );
        let mut short = [0.0f32; 4];
        assert_eq!(
            p.process(&mut [&mut a[..], &mut short[..]]),
            Err(ProcessError::ChannelLengthMismatch { expected: 8, got: 4 })
        );
    }

    #[test]
    fn empty_block_is_noop() {
        let mut p = ready(2, 8);
        let mut empty: [f32; 0] = [];
        assert!(p.process(&mut [&mut empty[..]]).is_ok());
        assert!(p.process(&mut []).is_ok());
    }

    #[test]
    fn golden_distortion_block() {
        let mut p = ready(1, 8);
        p.set_variant(DistortionVariant::Distortion);
        p.apply_parameters(&EffectParameters {
            drive: 0.5,
            tone: 0.5,
            output: 0.75,
            mix: 1.0,
            depth: 0.5,
            attack: 0.5,
            variant: DistortionVariant::Distortion,
            oversample: false,
        });

        let mut block = [0.9f32, -0.9, 0.0];
        p.process(&mut [&mut block[..]]).unwrap();

        let expected = [0.557_029_4f32, -0.480_226_8, -0.049_921_6];
        for (got, want) in block.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "got {got}, want {want}");
        }
        // first sample before tone: distortion clips at 0.66
        assert_eq!(distortion(0.9, 0.5), 0.66);
    }

    #[test]
    fn bypass_at_zero_mix() {
        let mut p = ready(2, 64);
        p.set_param(ParamId::Mix, 0.0);
        p.set_param(ParamId::Drive, 1.0);
        p.set_variant(DistortionVariant::Fuzz);
        p.set_oversampling(true);

        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin() * 0.7).collect();
        let mut left = input.clone();
        let mut right = input.clone();
        p.process(&mut [&mut left[..], &mut right[..]]).unwrap();
        assert_eq!(left, input);
        assert_eq!(right, input);
    }

    #[test]
    fn full_wet_scales_by_output() {
        let mut p = ready(1, 16);
        p.set_variant(DistortionVariant::Fuzz);
        p.set_param(ParamId::Tone, 1.0);
        p.set_param(ParamId::Depth, 1.0);
        p.set_param(ParamId::Output, 0.5);

        let mut block = [0.2f32; 16];
        p.process(&mut [&mut block[..]]).unwrap();
        let wet = libm::tanhf(fuzz(0.2, 0.5));
        for &s in &block {
            assert!((s - wet * 0.5).abs() < 1e-6, "got {s}");
        }
    }

    #[test]
    fn channels_do_not_bleed() {
        let mut p = ready(2, 32);
        p.set_param(ParamId::Tone, 0.0);
        let mut loud = [0.9f32; 32];
        let mut silent = [0.0f32; 32];
        p.process(&mut [&mut loud[..], &mut silent[..]]).unwrap();
        assert!(silent.iter().all(|&s| s == 0.0));
        assert!(loud.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn latency_follows_mode() {
        let p = ready(2, 32);
        assert_eq!(p.latency(), 0);
        p.set_oversampling(true);
        assert_eq!(p.latency(), 8);
        p.set_param(ParamId::Oversample, 0.2);
        assert_eq!(p.latency(), 0);
        assert!(!p.is_oversampling());
    }

    #[test]
    fn reset_preserves_parameters() {
        let mut p = ready(1, 16);
        p.set_param(ParamId::Drive, 0.9);
        p.set_variant(DistortionVariant::Saturation);
        let mut block = [0.5f32; 16];
        p.process(&mut [&mut block[..]]).unwrap();
        assert!(p.envelope_level() > 0.0);

        p.reset();
        assert_eq!(p.envelope_level(), 0.0);
        assert_eq!(p.get_param(ParamId::Drive), 0.9);
        assert_eq!(p.variant(), DistortionVariant::Saturation);

        let mut zeros = [0.0f32; 16];
        p.process(&mut [&mut zeros[..]]).unwrap();
        assert!(zeros.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn meters_track_last_block() {
        let mut p = ready(2, 8);
        p.set_param(ParamId::Mix, 0.0);
        let mut left = [0.1f32, -0.6, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0];
        let mut right = [0.3f32; 8];
        p.process(&mut [&mut left[..], &mut right[..]]).unwrap();
        assert_eq!(p.input_peak(), 0.6);
        assert_eq!(p.output_peak(), 0.6);
    }

    #[test]
    fn nan_input_is_flushed_and_counted() {
        let mut p = ready(1, 4);
        let mut block = [f32::NAN, 0.5, 0.5, 0.5];
        p.process(&mut [&mut block[..]]).unwrap();
        assert_eq!(p.non_finite_count(), 1);
        // tone memory stays clean after the flushed sample
        assert!(block[1..].iter().all(|s| s.is_finite()));
    }

    #[test]
    fn handle_controls_processor() {
        let p = ready(2, 8);
        let handle = p.handle();
        handle.set_param(ParamId::Attack, 0.25);
        handle.set_variant(DistortionVariant::Distortion);
        assert_eq!(p.get_param(ParamId::Attack), 0.25);
        assert_eq!(p.variant(), DistortionVariant::Distortion);
        assert_eq!(p.parameters(), handle.snapshot());
    }
}
