//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crunch_core::{DistortionVariant, EffectParameters, clamp_unit};

use crate::error::ConfigError;

/// Category given to presets created without one.
pub const USER_CATEGORY: &str = "User";

/// A named snapshot of the effect's settings.
///
/// Presets are stored as JSON. Values are written with 4-decimal precision;
/// anything read back is clamped into range before it reaches a processor.
///
/// # JSON Format
///
/// ```json
/// {
///   "name": "British Crunch",
///   "category": "Factory",
///   "type": "distortion",
///   "parameters": {
///     "drive": 0.55,
///     "tone": 0.5,
///     "output": 0.75,
///     "mix": 1.0,
///     "depth": 0.4,
///     "attack": 0.6
///   }
/// }
/// ```
///
/// An optional top-level `"oversample": true|false` is honoured when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Grouping shown by preset browsers ("Factory", "User", ...).
    #[serde(default = "default_category")]
    pub category: String,

    /// Distortion voice.
    #[serde(rename = "type", with = "variant_name")]
    pub variant: DistortionVariant,

    /// Continuous controls.
    #[serde(default)]
    pub parameters: PresetParameters,

    /// Oversampling, when the preset cares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oversample: Option<bool>,
}

/// The six continuous controls of a preset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresetParameters {
    /// Drive amount.
    pub drive: f32,
    /// Tone.
    pub tone: f32,
    /// Output level.
    pub output: f32,
    /// Wet/dry blend.
    pub mix: f32,
    /// Knee softness.
    pub depth: f32,
    /// Envelope follower speed.
    pub attack: f32,
}

impl Default for PresetParameters {
    fn default() -> Self {
        let p = EffectParameters::default();
        Self {
            drive: p.drive,
            tone: p.tone,
            output: p.output,
            mix: p.mix,
            depth: p.depth,
            attack: p.attack,
        }
    }
}

fn default_category() -> String {
    USER_CATEGORY.to_string()
}

/// Round to the 4-decimal precision of the preset format.
fn round4(value: f32) -> f32 {
    libm::roundf(clamp_unit(value) * 10_000.0) / 10_000.0
}

impl Preset {
    /// Create a preset with default parameters.
    pub fn new(name: impl Into<String>, variant: DistortionVariant) -> Self {
        Self {
            name: name.into(),
            category: default_category(),
            variant,
            parameters: PresetParameters::default(),
            oversample: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the continuous controls.
    pub fn with_parameters(mut self, parameters: PresetParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Record an oversampling preference.
    pub fn with_oversample(mut self, enabled: bool) -> Self {
        self.oversample = Some(enabled);
        self
    }

    /// Capture a processor's current settings.
    ///
    /// Values are rounded to 4 decimals; oversampling is not recorded.
    pub fn from_processor_state(
        name: impl Into<String>,
        category: impl Into<String>,
        params: &EffectParameters,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            variant: params.variant,
            parameters: PresetParameters {
                drive: round4(params.drive),
                tone: round4(params.tone),
                output: round4(params.output),
                mix: round4(params.mix),
                depth: round4(params.depth),
                attack: round4(params.attack),
            },
            oversample: None,
        }
    }

    /// Settings to hand to a processor.
    ///
    /// Every value is clamped into range. Oversampling comes from the
    /// preset when it carries a preference, otherwise from `base`.
    pub fn to_parameters(&self, base: &EffectParameters) -> EffectParameters {
        let p = &self.parameters;
        EffectParameters {
            drive: p.drive,
            tone: p.tone,
            output: p.output,
            mix: p.mix,
            depth: p.depth,
            attack: p.attack,
            variant: self.variant,
            oversample: self.oversample.unwrap_or(base.oversample),
        }
        .clamped()
    }

    /// Parse a preset from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the preset as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a preset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Save the preset to a JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// File name used when the preset is stored in a preset directory.
    ///
    /// Spaces become underscores: `"Hard Rock"` → `Hard_Rock.json`. Names
    /// that could leave the directory are rejected, see [`preset_file_name`].
    pub fn file_name(&self) -> Result<String, ConfigError> {
        preset_file_name(&self.name)
    }
}

/// File name for a preset called `name`.
///
/// The name must stay a single path component: empty names, path
/// separators, `..` and a leading `.` are rejected with
/// [`ConfigError::InvalidConfig`].
pub fn preset_file_name(name: &str) -> Result<String, ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('.')
        || trimmed.contains(['/', '\\'])
        || trimmed.contains("..")
    {
        return Err(ConfigError::InvalidConfig(format!(
            "invalid preset name '{name}'"
        )));
    }
    Ok(format!("{}.json", name.replace(' ', "_")))
}

/// `type` is stored as the lowercase variant name.
mod variant_name {
    use crunch_core::DistortionVariant;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        variant: &DistortionVariant,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(variant.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DistortionVariant, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
