//! Application settings - persisted user preferences.
//!
//! Settings are loaded from disk at startup and saved when changed.

use std::path::{Path, PathBuf};

use anyhow::Context;
use portal_backdrop::BackdropSettings;
use portal_core::{ThemeMarkers, ThemeState};
use serde::{Deserialize, Serialize};

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Application settings.
///
/// Serialized to TOML and stored in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme preferences.
    pub appearance: AppearanceSettings,

    /// Initial window geometry.
    pub window: WindowSettings,

    /// Decorative background refresh.
    pub backdrop: BackdropSettings,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path. Missing or invalid files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| match toml::from_str(&content) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    tracing::warn!("Ignoring invalid settings file {}: {}", path.display(), err);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Save settings to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content).context("Failed to write settings")
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "Portal", "Portal")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

// =============================================================================
// APPEARANCE
// =============================================================================

/// Theme preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceSettings {
    /// Theme applied at startup.
    pub theme: ThemeState,

    /// Follow the operating system's light/dark setting.
    pub follow_system: bool,

    /// Marker classes written to the style surface.
    pub markers: ThemeMarkers,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: ThemeState::Light,
            follow_system: true,
            markers: ThemeMarkers::default(),
        }
    }
}

// =============================================================================
// WINDOW
// =============================================================================

/// Initial window geometry in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}
