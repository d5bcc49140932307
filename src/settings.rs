//! Game settings and configuration
//!
//! `settings.ron` holds keybindings, vsync and the arena tuning. A missing or
//! unreadable file falls back to defaults with a warning.

use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::combat::BattleTuning;
use crate::keybindings::Keybindings;

/// User-configurable game settings
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub vsync: bool,
    pub keybindings: Keybindings,
    /// Arena layout, health pools and starting difficulty
    pub tuning: BattleTuning,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            keybindings: Keybindings::default(),
            tuning: BattleTuning::default(),
        }
    }
}

impl GameSettings {
    /// Settings live next to the executable
    fn settings_path() -> PathBuf {
        PathBuf::from("settings.ron")
    }

    /// Load settings from `settings.ron`, or defaults
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Ignoring settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read settings file: {}", e))?;
        let settings: Self =
            ron::from_str(&contents).map_err(|e| format!("Failed to parse settings file: {}", e))?;
        settings.tuning.validate()?;
        Ok(settings)
    }
}

/// Plugin for managing game settings
pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = GameSettings::load();
        let keybindings = settings.keybindings.clone();

        app.insert_resource(settings)
            .insert_resource(keybindings)
            .add_systems(Update, apply_vsync);
    }
}

fn apply_vsync(settings: Res<GameSettings>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    if !settings.is_changed() {
        return;
    }
    if let Ok(mut window) = windows.get_single_mut() {
        window.present_mode = if settings.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        };
        debug!("Applied VSync: {}", settings.vsync);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("duelarena_{}_{}.ron", name, std::process::id()))
    }

    #[test]
    fn test_written_settings_load_back() {
        let path = temp_path("roundtrip");
        let mut settings = GameSettings::default();
        settings.tuning.boss_max_health = 45;
        settings.tuning.difficulty.boss_fire_interval_ms = 800;
        let text =
            ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        fs::write(&path, text).unwrap();

        let loaded = GameSettings::load_from(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.tuning.boss_max_health, 45);
        assert_eq!(loaded.tuning.difficulty.boss_fire_interval_ms, 800);
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let path = temp_path("invalid");
        fs::write(&path, "(tuning: (boss_max_health: 0))").unwrap();

        let loaded = GameSettings::load_from(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.tuning, BattleTuning::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = GameSettings::load_from(Path::new("/nonexistent/duelarena/settings.ron"));
        assert!(loaded.vsync);
    }
}
