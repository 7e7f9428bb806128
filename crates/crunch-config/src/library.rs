//! Factory and user presets behind one lookup.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::factory_presets::{factory_presets, is_factory_preset};
use crate::preset::{Preset, USER_CATEGORY, preset_file_name};

/// Factory presets plus the user presets found in one directory.
///
/// User presets are the `*.json` files directly inside the directory. A file
/// that fails to parse is skipped with a warning. User presets are always
/// filed under the `"User"` category, whatever the file says.
#[derive(Debug, Clone)]
pub struct PresetLibrary {
    user_dir: Option<PathBuf>,
    presets: Vec<Preset>,
}

impl PresetLibrary {
    /// Library with the factory presets only.
    pub fn factory() -> Self {
        Self {
            user_dir: None,
            presets: factory_presets(),
        }
    }

    /// Library with factory presets and the user presets in `dir`.
    ///
    /// A missing directory is not an error; it is created on first save.
    pub fn with_user_dir(dir: impl Into<PathBuf>) -> Self {
        let mut library = Self {
            user_dir: Some(dir.into()),
            presets: Vec::new(),
        };
        library.rescan();
        library
    }

    /// User preset directory, if any.
    pub fn user_dir(&self) -> Option<&Path> {
        self.user_dir.as_deref()
    }

    /// Reload factory presets and rescan the user directory.
    pub fn rescan(&mut self) {
        self.presets = factory_presets();
        if let Some(dir) = &self.user_dir {
            for path in list_presets_in_dir(dir) {
                match Preset::load(&path) {
                    Ok(mut preset) => {
                        preset.category = USER_CATEGORY.to_string();
                        self.presets.push(preset);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable preset");
                    }
                }
            }
        }
        tracing::debug!(count = self.presets.len(), "preset library loaded");
    }

    /// Every preset, factory first.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Find a preset by exact name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Find a preset by exact name, or fail with [`ConfigError::PresetNotFound`].
    pub fn require(&self, name: &str) -> Result<&Preset, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.presets
            .iter()
            .map(|p| p.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Presets in one category, in library order.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Preset> + 'a {
        self.presets.iter().filter(move |p| p.category == category)
    }

    /// Store `preset` in the user directory and rescan.
    ///
    /// Returns the written path. Factory names are read-only.
    pub fn save_user(&mut self, preset: &Preset) -> Result<PathBuf, ConfigError> {
        if is_factory_preset(&preset.name) {
            return Err(ConfigError::ReadOnlyPreset(preset.name.clone()));
        }
        let dir = self.require_user_dir()?;
        let path = dir.join(preset.file_name()?);
        let mut stored = preset.clone();
        stored.category = USER_CATEGORY.to_string();
        stored.save(&path)?;
        self.rescan();
        Ok(path)
    }

    /// Delete a user preset by name and rescan.
    pub fn delete_user(&mut self, name: &str) -> Result<(), ConfigError> {
        if is_factory_preset(name) {
            return Err(ConfigError::ReadOnlyPreset(name.to_string()));
        }
        let dir = self.require_user_dir()?;
        let path = dir.join(preset_file_name(name)?);
        if !path.is_file() {
            return Err(ConfigError::PresetNotFound(name.to_string()));
        }
        std::fs::remove_file(&path).map_err(|e| ConfigError::remove_file(&path, e))?;
        self.rescan();
        Ok(())
    }

    fn require_user_dir(&self) -> Result<PathBuf, ConfigError> {
        self.user_dir
            .clone()
            .ok_or_else(|| ConfigError::InvalidConfig("no user preset directory".to_string()))
    }
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::factory()
    }
}

/// `*.json` files directly inside `dir`, sorted by path.
fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths
}
