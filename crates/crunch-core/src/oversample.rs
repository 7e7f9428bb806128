//! 2x oversampling for anti-aliased nonlinear processing.
//!
//! Nonlinear stages generate harmonics that can exceed Nyquist and alias back
//! into the audible band. The processor runs its shaping chain on a 2x
//! stream:
//!
//! 1. **Upsampling**: every even output is the input sample verbatim, every
//!    odd output is interpolated with the FIR kernel
//! 2. **Processing**: the shaping chain runs at 2x the base rate
//! 3. **Downsampling**: the same kernel low-passes the 2x stream, keeping
//!    every second sample
//!
//! ## Block boundaries
//!
//! Both directions carry their filter history across calls, so feeding one
//! signal in blocks of any size produces exactly the same stream as feeding
//! it in one call. [`Oversampler::reset`] clears the history; the kernel is
//! untouched.
//!
//! ## Interpolation
//!
//! Upsampling filters the zero-stuffed stream, not the base-rate input
//! itself. An even output is the input sample verbatim (`x[t - 4]`); an odd
//! output sums only the odd taps, the ones that land on real samples, over
//! the last 8 inputs and multiplies by the factor. The odd taps sum to about
//! 0.5, so DC passes at unity. Convolving the base-rate input with all 16
//! taps and then multiplying by the factor would double DC at the
//! interpolated positions.
//!
//! ## Latency
//!
//! [`Oversampler::latency`] reports `KERNEL_LEN / 2 = 8` base-rate samples.
//! The measured group delay of the up/down cascade is slightly shorter: an
//! impulse peaks at base-rate index 7.

/// Oversampling factor.
pub const OVERSAMPLE_FACTOR: usize = 2;

/// Number of FIR taps.
pub const KERNEL_LEN: usize = 16;

/// Interpolation history length at the base rate.
///
/// The odd taps of the kernel land on `KERNEL_LEN / 2` real samples of the
/// zero-stuffed stream.
const UP_HISTORY: usize = KERNEL_LEN / OVERSAMPLE_FACTOR;

/// Design the anti-aliasing kernel.
///
/// Windowed-sinc lowpass (Blackman window) with cutoff at the base-rate
/// Nyquist, i.e. `0.5 / factor` of the oversampled rate. The coefficients
/// are symmetric (linear phase) and sum to 1.0 (unity DC gain through the
/// decimator). For an even tap count the even-indexed and odd-indexed taps
/// mirror each other, so each polyphase branch sums to `1 / factor`.
///
/// Reference: A.V. Oppenheim & R.W. Schafer, "Discrete-Time Signal Processing",
/// Chapter 7 (FIR filter design using the window method).
pub fn design_kernel() -> [f32; KERNEL_LEN] {
    use core::f64::consts::PI;

    let n = KERNEL_LEN as f64;
    let cutoff = 0.5 / OVERSAMPLE_FACTOR as f64;
    let centre = (n - 1.0) / 2.0;

    let mut taps = [0.0f64; KERNEL_LEN];
    for (j, tap) in taps.iter_mut().enumerate() {
        let t = j as f64 - centre;
        let x = 2.0 * cutoff * t;
        let sinc = if x == 0.0 {
            1.0
        } else {
            libm::sin(PI * x) / (PI * x)
        };
        let phase = 2.0 * PI * j as f64 / (n - 1.0);
        let window = 0.42 - 0.5 * libm::cos(phase) + 0.08 * libm::cos(2.0 * phase);
        *tap = 2.0 * cutoff * sinc * window;
    }

    let sum: f64 = taps.iter().sum();
    let mut kernel = [0.0f32; KERNEL_LEN];
    // Mirror the first half so symmetry is exact after rounding to f32.
    for j in 0..KERNEL_LEN / 2 {
        let tap = (taps[j] / sum) as f32;
        kernel[j] = tap;
        kernel[KERNEL_LEN - 1 - j] = tap;
    }
    kernel
}

/// 2x upsampler/downsampler pair sharing one FIR kernel.
///
/// Owns only fixed-size arrays: no allocation after construction, safe to
/// call from the audio thread. One instance per channel, since the history
/// belongs to a single signal.
///
/// # Memory Usage
///
/// - Kernel: `KERNEL_LEN` × `f32` = 64 bytes
/// - Interpolation history: `KERNEL_LEN / 2` × `f32` = 32 bytes
/// - Decimation history: `KERNEL_LEN` × `f32` = 64 bytes
#[derive(Debug, Clone)]
pub struct Oversampler {
    kernel: [f32; KERNEL_LEN],
    /// Base sample rate (before oversampling)
    sample_rate: f32,
    /// Last `UP_HISTORY` base-rate inputs, oldest first
    up_history: [f32; UP_HISTORY],
    /// Last `KERNEL_LEN` oversampled samples, oldest first
    down_history: [f32; KERNEL_LEN],
}

impl Oversampler {
    /// Create an oversampler for the given base sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            kernel: design_kernel(),
            sample_rate,
            up_history: [0.0; UP_HISTORY],
            down_history: [0.0; KERNEL_LEN],
        }
    }

    /// Oversampling factor (always 2).
    pub fn factor(&self) -> usize {
        OVERSAMPLE_FACTOR
    }

    /// Base sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Oversampled rate in Hz.
    pub fn oversampled_rate(&self) -> f32 {
        self.sample_rate * OVERSAMPLE_FACTOR as f32
    }

    /// FIR coefficients.
    pub fn kernel(&self) -> &[f32; KERNEL_LEN] {
        &self.kernel
    }

    /// Latency in base-rate samples.
    pub fn latency(&self) -> usize {
        KERNEL_LEN / 2
    }

    /// Upsample `input` into `output` (`output.len() == input.len() * 2`).
    ///
    /// For the zero-stuffed stream `z` (`z[2c] = x[c]`, `z[2c+1] = 0`), the
    /// interpolated sample at odd position `p` is
    /// `2 * Σ kernel[j] * z[p - 8 + j]`: only the odd taps hit real samples,
    /// and the factor restores the energy lost to zero insertion. Output is
    /// delayed by 4 base samples so the window never reaches past the newest
    /// input.
    pub fn upsample(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            output.len(),
            input.len() * OVERSAMPLE_FACTOR,
            "Upsample output must be factor x input length"
        );

        for (&x, pair) in input.iter().zip(output.chunks_exact_mut(OVERSAMPLE_FACTOR)) {
            self.up_history.copy_within(1.., 0);
            self.up_history[UP_HISTORY - 1] = x;

            let mut interpolated = 0.0;
            for (k, &h) in self.up_history.iter().enumerate() {
                interpolated += self.kernel[2 * k + 1] * h;
            }

            pair[0] = self.up_history[UP_HISTORY / 2 - 1];
            pair[1] = interpolated * OVERSAMPLE_FACTOR as f32;
        }
    }

    /// Downsample `input` into `output` (`input.len() == output.len() * 2`).
    ///
    /// Each output sample is `Σ kernel[j] * u[m - 15 + j]` over the newest
    /// 16 oversampled samples `u`, reading from carried history where the
    /// window reaches before the current block. The kernel is symmetric, so
    /// reversed and forward order are the same coefficients.
    pub fn downsample(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len() * OVERSAMPLE_FACTOR,
            "Downsample input must be factor x output length"
        );

        for (pair, out) in input.chunks_exact(OVERSAMPLE_FACTOR).zip(output.iter_mut()) {
            self.down_history.copy_within(OVERSAMPLE_FACTOR.., 0);
            self.down_history[KERNEL_LEN - OVERSAMPLE_FACTOR..].copy_from_slice(pair);

            let mut sum = 0.0;
            for (&u, &h) in self.down_history.iter().zip(self.kernel.iter()) {
                sum += u * h;
            }
            *out = sum;
        }
    }

    /// Clear carried filter history. The kernel is unchanged.
    pub fn reset(&mut self) {
        self.up_history = [0.0; UP_HISTORY];
        self.down_history = [0.0; KERNEL_LEN];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48000.0;

    #[test]
    fn kernel_is_symmetric_and_normalized() {
        let kernel = design_kernel();
        for j in 0..KERNEL_LEN {
            assert_eq!(kernel[j], kernel[KERNEL_LEN - 1 - j]);
        }
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "kernel sum = {sum}");

        let odd: f32 = kernel.iter().skip(1).step_by(2).sum();
        assert!((odd - 0.5).abs() < 1e-5, "odd branch sum = {odd}");
    }

    #[test]
    fn kernel_peaks_in_the_middle() {
        let kernel = design_kernel();
        let centre = kernel[KERNEL_LEN / 2];
        assert!(kernel.iter().all(|&h| h <= centre));
        assert!(kernel[0].abs() < 0.01);
    }

    #[test]
    fn latency_is_half_the_kernel() {
        let os = Oversampler::new(SAMPLE_RATE);
        assert_eq!(os.latency(), 8);
        assert_eq!(os.factor(), 2);
        assert_eq!(Oversampler::new(96000.0).latency(), 8);
        assert_eq!(os.oversampled_rate(), 96000.0);
    }

    #[test]
    fn upsample_keeps_input_samples_verbatim() {
        let mut os = Oversampler::new(SAMPLE_RATE);
        let input: Vec<f32> = (0..32).map(|i| (i as f32 * 0.37).sin()).collect();
        let mut up = vec![0.0; 64];
        os.upsample(&input, &mut up);

        let delay = UP_HISTORY / 2;
        for c in delay..input.len() {
            assert_eq!(up[2 * c], input[c - delay]);
        }
    }

    #[test]
    fn dc_passes_at_unity() {
        let mut os = Oversampler::new(SAMPLE_RATE);
        let input = [1.0f32; 64];
        let mut up = [0.0f32; 128];
        let mut down = [0.0f32; 64];
        os.upsample(&input, &mut up);
        os.downsample(&up, &mut down);

        for &s in &up[40..] {
            assert!((s - 1.0).abs() < 1e-4, "upsampled DC = {s}");
        }
        for &s in &down[32..] {
            assert!((s - 1.0).abs() < 1e-4, "round-trip DC = {s}");
        }
    }

    #[test]
    fn blocks_are_seamless() {
        let signal: Vec<f32> = (0..96).map(|i| (i as f32 * 0.21).sin() * 0.8).collect();

        let mut whole = Oversampler::new(SAMPLE_RATE);
        let mut up_whole = vec![0.0; 192];
        let mut out_whole = vec![0.0; 96];
        whole.upsample(&signal, &mut up_whole);
        whole.downsample(&up_whole, &mut out_whole);

        let mut split = Oversampler::new(SAMPLE_RATE);
        let mut out_split = vec![0.0; 96];
        let mut offset = 0;
        for len in [7usize, 32, 1, 56] {
            let mut up = vec![0.0; len * 2];
            split.upsample(&signal[offset..offset + len], &mut up);
            split.downsample(&up, &mut out_split[offset..offset + len]);
            offset += len;
        }

        assert_eq!(out_whole, out_split);
    }

    #[test]
    fn reset_clears_history() {
        let mut os = Oversampler::new(SAMPLE_RATE);
        let kernel = *os.kernel();
        let mut up = [0.0f32; 32];
        let mut down = [0.0f32; 16];
        os.upsample(&[1.0; 16], &mut up);
        os.downsample(&up, &mut down);

        os.reset();
        os.upsample(&[0.0; 16], &mut up);
        os.downsample(&up, &mut down);
        assert!(up.iter().all(|&s| s == 0.0));
        assert!(down.iter().all(|&s| s == 0.0));
        assert_eq!(*os.kernel(), kernel);
    }
}
