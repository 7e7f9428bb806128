//! Shared CLI helpers used across multiple commands.

use crunch_config::{Preset, PresetLibrary, get_factory_preset};
use crunch_core::ParamId;
use std::path::{Path, PathBuf};

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let Some((key, value)) = s.split_once('=') else {
        return Err(format!(
            "Invalid parameter format: '{s}' (expected key=value)"
        ));
    };
    Ok((key.trim().to_string(), value.trim().to_string()))
}

/// Resolve a `key=value` pair to a parameter and its value.
///
/// `oversample` also accepts `on`/`off`/`true`/`false`.
pub fn parse_param(key: &str, value: &str) -> anyhow::Result<(ParamId, f32)> {
    let Some(id) = ParamId::from_id(&key.to_ascii_lowercase()) else {
        let known: Vec<&str> = ParamId::ALL.iter().map(|p| p.id()).collect();
        anyhow::bail!("Unknown parameter '{key}'. Known: {}", known.join(", "));
    };

    let parsed = match value.to_ascii_lowercase().as_str() {
        "on" | "true" if id.is_boolean() => 1.0,
        "off" | "false" if id.is_boolean() => 0.0,
        other => other
            .parse::<f32>()
            .map_err(|_| anyhow::anyhow!("Invalid value '{value}' for parameter '{key}'"))?,
    };
    Ok((id, parsed))
}

/// Build a preset library, including user presets when a directory is given.
pub fn library(preset_dir: Option<&Path>) -> PresetLibrary {
    match preset_dir {
        Some(dir) => PresetLibrary::with_user_dir(dir),
        None => PresetLibrary::factory(),
    }
}

/// Load a preset by name or path.
///
/// Searches in this order:
/// 1. Library presets (factory and user) by exact name
/// 2. Factory presets, case-insensitive
/// 3. File path to a `.json` preset
pub fn load_preset(name: &str, preset_dir: Option<&Path>) -> anyhow::Result<Preset> {
    if let Some(preset) = library(preset_dir).get(name) {
        return Ok(preset.clone());
    }

    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = PathBuf::from(name);
    if path.is_file() {
        return Ok(Preset::load(&path)?);
    }

    anyhow::bail!("Preset '{name}' not found. Use 'crunch presets list' to see available presets.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("drive=0.5"),
            Ok(("drive".to_string(), "0.5".to_string()))
        );
        assert_eq!(
            parse_key_val("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_key_val("drive").is_err());
    }

    #[test]
    fn params_resolve_by_id() {
        let (id, value) = parse_param("Drive", "0.7").unwrap();
        assert_eq!(id, ParamId::Drive);
        assert_eq!(value, 0.7);

        assert_eq!(parse_param("oversample", "on").unwrap().1, 1.0);
        assert_eq!(parse_param("oversample", "off").unwrap().1, 0.0);
        assert!(parse_param("volume", "1").is_err());
        assert!(parse_param("tone", "bright").is_err());
        assert!(parse_param("tone", "on").is_err());
    }

    #[test]
    fn factory_preset_found_case_insensitively() {
        let preset = load_preset("fuzzy math", None).unwrap();
        assert_eq!(preset.name, "Fuzzy Math");
        assert!(load_preset("nonexistent preset", None).is_err());
    }
}
