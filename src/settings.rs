// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::geometry::Color;

const APP_DIR: &str = "pixmap";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugOverlaySettings {
    /// Stroke sprite outlines after each outlined draw call.
    pub enabled: bool,
    pub color: Color,
}

impl Default for DebugOverlaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::GREEN,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphicsSettings {
    pub debug_overlay: DebugOverlaySettings,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization Error: {0}")]
    Deserialize(#[from] toml::de::Error),

    #[error("Serialization Error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Configuration Directory Not Found")]
    ConfigDirNotFound,
}

impl GraphicsSettings {
    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay.enabled = enabled;
        self
    }

    /// Location of the settings file beneath `config_root`.
    pub fn settings_path_in(config_root: &Path) -> PathBuf {
        config_root.join(APP_DIR).join(SETTINGS_FILE)
    }

    /// Location of the settings file in the user's configuration directory.
    pub fn user_settings_path() -> Result<PathBuf, SettingsError> {
        let config_root = config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
        Ok(Self::settings_path_in(&config_root))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings: GraphicsSettings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Saves settings to `path`, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reads the settings file under `config_root`, writing the defaults there
    /// first if it does not exist yet.
    pub fn load_or_create_in(config_root: &Path) -> Result<Self, SettingsError> {
        let path = Self::settings_path_in(config_root);
        if path.exists() {
            return Self::load_from_file(&path);
        }

        log::info!("settings not found, writing defaults to {}", path.display());
        let settings = Self::default();
        settings.save_to_file(&path)?;
        Ok(settings)
    }

    /// Loads the user's settings, falling back to defaults on any error.
    pub fn load_user_settings() -> Self {
        let result = config_dir()
            .ok_or(SettingsError::ConfigDirNotFound)
            .and_then(|root| Self::load_or_create_in(&root));
        match result {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("error loading graphics settings: {}, using defaults", e);
                Self::default()
            }
        }
    }
}
