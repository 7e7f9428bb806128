//! Nonlinear transfer functions and the depth (knee) stage.
//!
//! Every function here is pure: `(sample, control) -> sample`, no state, no
//! allocation. The tone stage needs filter memory and lives in
//! [`crate::tone`].
//!
//! | Variant | Curve | Gain range | Character |
//! |---------|-------|------------|-----------|
//! | [`overdrive`] | `tanh(x * gain * knee)` | 1x to 5x | Smooth, symmetric |
//! | [`distortion`] | clamp to a stepped threshold | 1x to 11x | Hard, odd harmonics |
//! | [`fuzz`] | `sign(x) * tanh(|x| * softness)` | 1x to 21x | Near-square |
//! | [`saturation`] | `tanh` above zero, `0.7 * tanh(0.7x)` below | 1x to 4x | Asymmetric, even harmonics |
//!
//! All math goes through `libm` so output is bit-identical on every target.

use core::fmt;
use core::str::FromStr;
use libm::tanhf;

/// Hard-clip thresholds for [`distortion`], indexed by `floor(drive * 4)`.
pub const CLIP_THRESHOLDS: [f32; 5] = [0.33, 0.5, 0.66, 0.8, 1.0];

/// The four distortion voices.
///
/// Closed set: dispatch is an exhaustive `match`, and every conversion from
/// untrusted input clamps into range instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistortionVariant {
    /// Soft clipping (tanh).
    #[default]
    Overdrive,
    /// Stepped hard clipping.
    Distortion,
    /// Near-square fuzz.
    Fuzz,
    /// Asymmetric tape saturation.
    Saturation,
}

impl DistortionVariant {
    /// All variants in index order.
    pub const ALL: [Self; 4] = [
        Self::Overdrive,
        Self::Distortion,
        Self::Fuzz,
        Self::Saturation,
    ];

    /// Zero-based index of this variant.
    pub const fn index(self) -> u8 {
        match self {
            Self::Overdrive => 0,
            Self::Distortion => 1,
            Self::Fuzz => 2,
            Self::Saturation => 3,
        }
    }

    /// Variant for an exact index, or `None` if the index names no variant.
    pub const fn try_from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Overdrive),
            1 => Some(Self::Distortion),
            2 => Some(Self::Fuzz),
            3 => Some(Self::Saturation),
            _ => None,
        }
    }

    /// Variant for an automation-supplied index, clamped into range.
    ///
    /// Negative values select `Overdrive`, values above 3 select `Saturation`.
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.clamp(0, 3) as usize]
    }

    /// Variant for a normalized host choice value in \[0.0, 1.0\].
    ///
    /// The four choices sit at 0, 1/3, 2/3 and 1; the nearest one wins.
    pub fn from_normalized(value: f32) -> Self {
        let v = crate::math::clamp_unit(value);
        Self::from_index(libm::roundf(v * 3.0) as i64)
    }

    /// Normalized host value for this variant (inverse of [`from_normalized`](Self::from_normalized)).
    pub fn to_normalized(self) -> f32 {
        f32::from(self.index()) / 3.0
    }

    /// Lowercase name used by the preset format.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Overdrive => "overdrive",
            Self::Distortion => "distortion",
            Self::Fuzz => "fuzz",
            Self::Saturation => "saturation",
        }
    }

    /// Apply this variant's transfer function.
    #[inline]
    pub fn shape(self, sample: f32, drive: f32) -> f32 {
        match self {
            Self::Overdrive => overdrive(sample, drive),
            Self::Distortion => distortion(sample, drive),
            Self::Fuzz => fuzz(sample, drive),
            Self::Saturation => saturation(sample, drive),
        }
    }
}

impl fmt::Display for DistortionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown distortion type: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for DistortionVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.name() == lower)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Dispatch on a raw variant index.
///
/// An index that names no variant returns `sample` unchanged.
#[inline]
pub fn shape_raw(index: u8, sample: f32, drive: f32) -> f32 {
    match DistortionVariant::try_from_index(index) {
        Some(variant) => variant.shape(sample, drive),
        None => sample,
    }
}

/// Overdrive: tanh soft clipping with drive-dependent knee.
#[inline]
pub fn overdrive(sample: f32, drive: f32) -> f32 {
    let gain = 1.0 + 4.0 * drive;
    let knee = 1.0 + 2.0 * drive;
    tanhf(sample * gain * knee)
}

/// Distortion: hard clip against a threshold stepped by drive.
///
/// Output is bounded by the selected threshold, at most 1.0.
#[inline]
pub fn distortion(sample: f32, drive: f32) -> f32 {
    let gain = 1.0 + 10.0 * drive;
    // Index saturates at 4 for drive >= 1.0; negative or NaN drive casts to 0.
    let index = ((drive * 4.0) as usize).min(CLIP_THRESHOLDS.len() - 1);
    let threshold = CLIP_THRESHOLDS[index];
    (sample * gain).clamp(-threshold, threshold)
}

/// Fuzz: odd-symmetric near-square saturation.
///
/// `fuzz(-s, d) == -fuzz(s, d)` exactly.
#[inline]
pub fn fuzz(sample: f32, drive: f32) -> f32 {
    let gain = 1.0 + 20.0 * drive;
    let softness = 1.0 - 0.5 * drive;
    let x = sample * gain;
    let magnitude = tanhf(x.abs() * softness);
    if x < 0.0 { -magnitude } else { magnitude }
}

/// Tape saturation: full tanh on the positive half, a compressed and
/// attenuated curve on the negative half.
#[inline]
pub fn saturation(sample: f32, drive: f32) -> f32 {
    let gain = 1.0 + 3.0 * drive;
    let x = sample * gain;
    if x >= 0.0 {
        tanhf(x)
    } else {
        0.7 * tanhf(0.7 * x)
    }
}

/// Depth: blend a hard knee and a soft knee.
///
/// `knee = 0.2 + 0.8 * depth`; `depth = 0` is the fully hard knee
/// (`clamp(x / knee, -1, 1)`), `depth = 1` the fully soft one (`tanh(x / knee)`).
#[inline]
pub fn depth(sample: f32, depth: f32) -> f32 {
    let knee = 0.2 + 0.8 * depth;
    let scaled = sample / knee;
    let soft = tanhf(scaled);
    let hard = scaled.clamp(-1.0, 1.0);
    (1.0 - depth) * hard + depth * soft
}
