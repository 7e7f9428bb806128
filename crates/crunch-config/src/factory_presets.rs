//! Factory presets bundled with the library.
//!
//! Always available without external files. Stored in the same JSON shape
//! as user presets so they double as format examples.

use crate::Preset;

/// Category of every bundled preset.
pub const FACTORY_CATEGORY: &str = "Factory";

/// Display names of the factory presets, in program order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "Vintage Overdrive",
    "British Crunch",
    "Hard Rock",
    "Fuzzy Math",
    "Clean Boost",
    "Studio Warmth",
];

static FACTORY_PRESETS_JSON: &[&str] = &[
    VINTAGE_OVERDRIVE,
    BRITISH_CRUNCH,
    HARD_ROCK,
    FUZZY_MATH,
    CLEAN_BOOST,
    STUDIO_WARMTH,
];

const VINTAGE_OVERDRIVE: &str = r#"{
  "name": "Vintage Overdrive",
  "category": "Factory",
  "type": "overdrive",
  "parameters": { "drive": 0.4, "tone": 0.6, "output": 0.8, "mix": 1.0, "depth": 0.5, "attack": 0.5 },
  "oversample": false
}"#;

const BRITISH_CRUNCH: &str = r#"{
  "name": "British Crunch",
  "category": "Factory",
  "type": "distortion",
  "parameters": { "drive": 0.55, "tone": 0.5, "output": 0.75, "mix": 1.0, "depth": 0.4, "attack": 0.6 },
  "oversample": false
}"#;

const HARD_ROCK: &str = r#"{
  "name": "Hard Rock",
  "category": "Factory",
  "type": "distortion",
  "parameters": { "drive": 0.75, "tone": 0.4, "output": 0.7, "mix": 1.0, "depth": 0.3, "attack": 0.7 },
  "oversample": true
}"#;

const FUZZY_MATH: &str = r#"{
  "name": "Fuzzy Math",
  "category": "Factory",
  "type": "fuzz",
  "parameters": { "drive": 0.85, "tone": 0.3, "output": 0.65, "mix": 1.0, "depth": 0.6, "attack": 0.3 },
  "oversample": true
}"#;

const CLEAN_BOOST: &str = r#"{
  "name": "Clean Boost",
  "category": "Factory",
  "type": "overdrive",
  "parameters": { "drive": 0.2, "tone": 0.8, "output": 0.9, "mix": 1.0, "depth": 0.8, "attack": 0.9 },
  "oversample": false
}"#;

const STUDIO_WARMTH: &str = r#"{
  "name": "Studio Warmth",
  "category": "Factory",
  "type": "saturation",
  "parameters": { "drive": 0.25, "tone": 0.7, "output": 0.85, "mix": 1.0, "depth": 0.7, "attack": 0.8 },
  "oversample": false
}"#;

/// Get all factory presets, in program order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_JSON
        .iter()
        .filter_map(|json| match Preset::from_json(json) {
            Ok(preset) => Some(preset),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed factory preset");
                None
            }
        })
        .collect()
}

/// Get a factory preset by name (case-insensitive).
///
/// Underscores match spaces, so file-style names work too.
///
/// # Example
///
/// ```rust
/// use crunch_config::get_factory_preset;
///
/// let preset = get_factory_preset("hard_rock").unwrap();
/// assert_eq!(preset.name, "Hard Rock");
/// assert_eq!(preset.oversample, Some(true));
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let wanted = normalize(name);
    factory_presets()
        .into_iter()
        .find(|preset| normalize(&preset.name) == wanted)
}

/// Check if a name belongs to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    let wanted = normalize(name);
    FACTORY_PRESET_NAMES
        .iter()
        .any(|factory| normalize(factory) == wanted)
}

fn normalize(name: &str) -> String {
    name.trim().replace('_', " ").to_lowercase()
}
