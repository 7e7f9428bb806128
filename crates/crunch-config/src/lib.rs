//! Presets and processor configuration for the crunch distortion.
//!
//! The data-only collaborators of [`crunch_core::SignalProcessor`]: nothing
//! here runs on the audio thread.
//!
//! # Features
//!
//! - **Presets**: JSON records of a variant and six controls, loaded and
//!   saved with 4-decimal precision
//! - **Factory Presets**: six built-in starting points
//! - **Preset Library**: factory presets plus a directory of user presets
//! - **Processor Config**: sample rate, block size and channel count from TOML
//!
//! # Example
//!
//! ```rust
//! use crunch_config::{ProcessorConfig, build_processor, get_factory_preset};
//!
//! let processor = build_processor(&ProcessorConfig::default()).unwrap();
//! let preset = get_factory_preset("British Crunch").unwrap();
//! processor.apply_parameters(&preset.to_parameters(&processor.parameters()));
//! assert_eq!(processor.variant(), preset.variant);
//! ```

mod config;
mod error;
mod library;
mod preset;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use config::{MAX_CHANNELS, ProcessorConfig, build_processor};
pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_CATEGORY, FACTORY_PRESET_NAMES, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use library::PresetLibrary;
pub use preset::{Preset, PresetParameters, USER_CATEGORY, preset_file_name};
