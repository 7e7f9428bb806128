//! Crunch Core - real-time distortion processing
//!
//! The numeric heart of the crunch distortion effect: four nonlinear voices,
//! a depth (knee) stage and a tone stage, optionally run at twice the sample
//! rate, blended back with the dry signal.
//!
//! # Building Blocks
//!
//! ## Shaping
//!
//! - [`DistortionVariant`] - Overdrive, Distortion, Fuzz, Saturation
//! - [`transfer`] - the pure transfer functions and the [`depth`] stage
//! - [`ToneFilter`] - one-pole tone control with per-channel memory
//!
//! ## Anti-Aliasing
//!
//! - [`Oversampler`] - streaming 2x up/down sampler with a 16-tap FIR kernel
//!
//! ## Processing
//!
//! - [`SignalProcessor`] - per-block transform: snapshot, shape, mix
//! - [`ParameterHandle`] - lock-free control-thread access to parameters
//! - [`EnvelopeFollower`] - input level tracking
//!
//! # Example
//!
//! ```rust
//! use crunch_core::{DistortionVariant, ParamId, SignalProcessor};
//!
//! let mut processor = SignalProcessor::new(1);
//! processor.initialize(44100.0, 64).unwrap();
//!
//! // Control thread
//! let handle = processor.handle();
//! handle.set_variant(DistortionVariant::Saturation);
//! handle.set_param(ParamId::Mix, 0.0);
//!
//! // Audio thread
//! let mut block = [0.5f32; 64];
//! processor.process(&mut [&mut block[..]]).unwrap();
//! assert_eq!(block, [0.5f32; 64]); // mix 0 is a full bypass
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: `process` never allocates, locks or blocks
//! - **Deterministic**: math goes through `libm`, identical input gives
//!   bit-identical output
//! - **No global state**: every filter memory belongs to an instance
//!
//! # Features
//!
//! - `tracing`: emit `debug` events on initialize, reset and oversampling
//!   changes, and a `warn` when non-finite samples are flushed

pub mod envelope;
pub mod error;
pub mod math;
pub mod oversample;
pub mod param;
pub mod processor;
pub mod tone;
pub mod transfer;

pub use envelope::EnvelopeFollower;
pub use error::ProcessError;
pub use math::{clamp_unit, compensated_mix, flush_denormal};
pub use oversample::{KERNEL_LEN, OVERSAMPLE_FACTOR, Oversampler, design_kernel};
pub use param::{AtomicParam, EffectParameters, ParamId, ParameterHandle, SharedParameters};
pub use processor::{DEFAULT_CHANNELS, SignalProcessor};
pub use tone::ToneFilter;
pub use transfer::{
    CLIP_THRESHOLDS, DistortionVariant, UnknownVariant, depth, distortion, fuzz, overdrive,
    saturation, shape_raw,
};
