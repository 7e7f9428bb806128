//! Parameter model and the lock-free store shared with the control thread.
//!
//! The control thread (UI, automation) writes through a [`ParameterHandle`];
//! the audio thread reads one [`EffectParameters`] snapshot per block. Every
//! parameter lives in its own atomic cell, so a single write is seen whole or
//! not at all. Consistency across parameters within one block is not
//! guaranteed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::math::clamp_unit;
use crate::transfer::DistortionVariant;

/// Automatable parameters.
///
/// The numeric index is stable and matches the host registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Input gain into the transfer function.
    Drive,
    /// Tone (0 = dark, 1 = bright).
    Tone,
    /// Wet output level.
    Output,
    /// Wet/dry blend.
    Mix,
    /// Knee softness.
    Depth,
    /// Envelope follower speed.
    Attack,
    /// 2x oversampling, boolean-coded (`value >= 0.5` is on).
    Oversample,
}

impl ParamId {
    /// All parameters in index order.
    pub const ALL: [Self; 7] = [
        Self::Drive,
        Self::Tone,
        Self::Output,
        Self::Mix,
        Self::Depth,
        Self::Attack,
        Self::Oversample,
    ];

    /// Zero-based index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter for an index, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable string id, as used in presets.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Drive => "drive",
            Self::Tone => "tone",
            Self::Output => "output",
            Self::Mix => "mix",
            Self::Depth => "depth",
            Self::Attack => "attack",
            Self::Oversample => "oversample",
        }
    }

    /// Display name for a host.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Drive => "Drive",
            Self::Tone => "Tone",
            Self::Output => "Output",
            Self::Mix => "Mix",
            Self::Depth => "Depth",
            Self::Attack => "Attack",
            Self::Oversample => "Oversample",
        }
    }

    /// Default normalized value.
    pub fn default_value(self) -> f32 {
        EffectParameters::default().get(self)
    }

    /// Whether the host should present this as an on/off switch.
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::Oversample)
    }

    /// Look up a parameter by its string id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

/// Plain-value parameter record.
///
/// Continuous fields are normalized to \[0.0, 1.0\]. Copied across the
/// control/audio boundary, never shared by reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParameters {
    /// Drive amount.
    pub drive: f32,
    /// Tone.
    pub tone: f32,
    /// Output level applied to the wet signal.
    pub output: f32,
    /// Wet/dry blend.
    pub mix: f32,
    /// Knee softness.
    pub depth: f32,
    /// Envelope follower speed.
    pub attack: f32,
    /// Distortion voice.
    pub variant: DistortionVariant,
    /// 2x oversampling.
    pub oversample: bool,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            drive: 0.5,
            tone: 0.5,
            output: 0.75,
            mix: 1.0,
            depth: 0.5,
            attack: 0.5,
            variant: DistortionVariant::Overdrive,
            oversample: false,
        }
    }
}

impl EffectParameters {
    /// Read a parameter as a normalized value (`Oversample` reads 1.0 or 0.0).
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Drive => self.drive,
            ParamId::Tone => self.tone,
            ParamId::Output => self.output,
            ParamId::Mix => self.mix,
            ParamId::Depth => self.depth,
            ParamId::Attack => self.attack,
            ParamId::Oversample => {
                if self.oversample {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Write a parameter, clamping into range.
    pub fn set(&mut self, id: ParamId, value: f32) {
        match id {
            ParamId::Drive => self.drive = clamp_unit(value),
            ParamId::Tone => self.tone = clamp_unit(value),
            ParamId::Output => self.output = clamp_unit(value),
            ParamId::Mix => self.mix = clamp_unit(value),
            ParamId::Depth => self.depth = clamp_unit(value),
            ParamId::Attack => self.attack = clamp_unit(value),
            ParamId::Oversample => self.oversample = value >= 0.5,
        }
    }

    /// Copy with every continuous field clamped into \[0.0, 1.0\].
    pub fn clamped(mut self) -> Self {
        for id in ParamId::ALL {
            let value = self.get(id);
            self.set(id, value);
        }
        self
    }
}

/// A thread-safe normalized parameter using bit-cast f32.
///
/// Control thread writes, audio thread reads. No locks, no allocations.
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicU32,
}

impl AtomicParam {
    /// Create a cell holding `value` (clamped).
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicU32::new(clamp_unit(value).to_bits()),
        }
    }

    /// Store a value, clamped to \[0.0, 1.0\].
    #[inline]
    pub fn set(&self, v: f32) {
        self.value.store(clamp_unit(v).to_bits(), Ordering::Release);
    }

    /// Load the current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Acquire))
    }
}

/// One atomic cell per parameter.
#[derive(Debug)]
pub struct SharedParameters {
    drive: AtomicParam,
    tone: AtomicParam,
    output: AtomicParam,
    mix: AtomicParam,
    depth: AtomicParam,
    attack: AtomicParam,
    variant: AtomicU8,
    oversample: AtomicBool,
}

impl SharedParameters {
    /// Create a store holding `params`.
    pub fn new(params: &EffectParameters) -> Self {
        Self {
            drive: AtomicParam::new(params.drive),
            tone: AtomicParam::new(params.tone),
            output: AtomicParam::new(params.output),
            mix: AtomicParam::new(params.mix),
            depth: AtomicParam::new(params.depth),
            attack: AtomicParam::new(params.attack),
            variant: AtomicU8::new(params.variant.index()),
            oversample: AtomicBool::new(params.oversample),
        }
    }

    fn cell(&self, id: ParamId) -> Option<&AtomicParam> {
        match id {
            ParamId::Drive => Some(&self.drive),
            ParamId::Tone => Some(&self.tone),
            ParamId::Output => Some(&self.output),
            ParamId::Mix => Some(&self.mix),
            ParamId::Depth => Some(&self.depth),
            ParamId::Attack => Some(&self.attack),
            ParamId::Oversample => None,
        }
    }

    /// Write a parameter. Continuous values are clamped; `Oversample` is on
    /// when `value >= 0.5`.
    pub fn set(&self, id: ParamId, value: f32) {
        match self.cell(id) {
            Some(cell) => cell.set(value),
            None => self.set_oversampling(value >= 0.5),
        }
    }

    /// Read a parameter as a normalized value.
    pub fn get(&self, id: ParamId) -> f32 {
        match self.cell(id) {
            Some(cell) => cell.get(),
            None => {
                if self.is_oversampling() {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Select the distortion voice.
    pub fn set_variant(&self, variant: DistortionVariant) {
        self.variant.store(variant.index(), Ordering::Release);
    }

    /// Raw stored variant index.
    ///
    /// Only [`set_variant`](Self::set_variant) writes the index, so it always
    /// names a variant. Raw host indices go through
    /// [`shape_raw`](crate::transfer::shape_raw) instead.
    pub fn variant_index(&self) -> u8 {
        self.variant.load(Ordering::Acquire)
    }

    /// Current distortion voice.
    ///
    /// Falls back to the default voice if the stored index names none.
    pub fn variant(&self) -> DistortionVariant {
        DistortionVariant::try_from_index(self.variant_index()).unwrap_or_default()
    }

    /// Enable or disable 2x oversampling.
    pub fn set_oversampling(&self, enabled: bool) {
        self.oversample.store(enabled, Ordering::Release);
    }

    /// Whether 2x oversampling is enabled.
    pub fn is_oversampling(&self) -> bool {
        self.oversample.load(Ordering::Acquire)
    }

    /// Read every parameter into a plain record.
    pub fn snapshot(&self) -> EffectParameters {
        EffectParameters {
            drive: self.drive.get(),
            tone: self.tone.get(),
            output: self.output.get(),
            mix: self.mix.get(),
            depth: self.depth.get(),
            attack: self.attack.get(),
            variant: self.variant(),
            oversample: self.is_oversampling(),
        }
    }

    /// Write every field of `params`.
    pub fn store(&self, params: &EffectParameters) {
        for id in ParamId::ALL {
            self.set(id, params.get(id));
        }
        self.set_variant(params.variant);
    }
}

impl Default for SharedParameters {
    fn default() -> Self {
        Self::new(&EffectParameters::default())
    }
}

/// Control-thread view of a processor's parameters.
///
/// Cheap to clone and `Send + Sync`; every method is wait-free.
#[derive(Debug, Clone)]
pub struct ParameterHandle {
    shared: Arc<SharedParameters>,
}

impl ParameterHandle {
    pub(crate) fn new(shared: Arc<SharedParameters>) -> Self {
        Self { shared }
    }

    /// Write a parameter (clamped).
    pub fn set_param(&self, id: ParamId, value: f32) {
        self.shared.set(id, value);
    }

    /// Read a parameter.
    pub fn get_param(&self, id: ParamId) -> f32 {
        self.shared.get(id)
    }

    /// Select the distortion voice.
    pub fn set_variant(&self, variant: DistortionVariant) {
        self.shared.set_variant(variant);
    }

    /// Current distortion voice.
    ///
    /// Falls back to the default voice if the stored index names none.
    pub fn variant(&self) -> DistortionVariant {
        self.shared.variant()
    }

    /// Enable or disable 2x oversampling.
    pub fn set_oversampling(&self, enabled: bool) {
        self.shared.set_oversampling(enabled);
    }

    /// Whether 2x oversampling is enabled.
    pub fn is_oversampling(&self) -> bool {
        self.shared.is_oversampling()
    }

    /// Snapshot of every parameter.
    pub fn snapshot(&self) -> EffectParameters {
        self.shared.snapshot()
    }

    /// Write every field of `params`.
    pub fn apply(&self, params: &EffectParameters) {
        self.shared.store(params);
    }
}
