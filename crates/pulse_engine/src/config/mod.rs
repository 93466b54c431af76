//! Configuration system

use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// Settings types load from and save to TOML or RON files, picked by file
/// extension.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level engine settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineSettings {
    /// Window section
    #[serde(default)]
    pub window: WindowSettings,
    /// World section
    #[serde(default)]
    pub world: WorldSettings,
}

impl Config for EngineSettings {}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Base window title; the frame loop appends the FPS readout
    #[serde(default = "default_window_title")]
    pub title: String,
    /// Window width in pixels
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Window height in pixels
    #[serde(default = "default_window_height")]
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

fn default_window_title() -> String {
    "Pulse".to_string()
}

fn default_window_width() -> u32 {
    1200
}

fn default_window_height() -> u32 {
    800
}

/// World startup settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldSettings {
    /// RON world file to populate the world from at startup, if any
    #[serde(default)]
    pub definition_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: EngineSettings = toml::from_str("[window]\ntitle = \"Demo\"\n").unwrap();
        assert_eq!(settings.window.title, "Demo");
        assert_eq!(settings.window.width, 1200);
        assert_eq!(settings.window.height, 800);
        assert_eq!(settings.world.definition_file, None);
    }

    #[test]
    fn empty_settings_are_fully_defaulted() {
        let settings: EngineSettings = toml::from_str("").unwrap();
        assert_eq!(settings.window.title, "Pulse");
        assert_eq!(settings.world.definition_file, None);
    }

    #[test]
    fn settings_round_trip_through_a_toml_file() {
        let path = std::env::temp_dir().join("pulse_engine_settings_roundtrip.toml");
        let path = path.to_string_lossy().into_owned();

        let mut settings = EngineSettings::default();
        settings.window.title = "Round Trip".to_string();
        settings.world.definition_file = Some("worlds/demo.ron".to_string());
        settings.save_to_file(&path).unwrap();

        let loaded = EngineSettings::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.window.title, "Round Trip");
        assert_eq!(loaded.window.width, settings.window.width);
        assert_eq!(loaded.world.definition_file.as_deref(), Some("worlds/demo.ron"));
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        // The extension check runs before any file IO, so nothing is written.
        let result = EngineSettings::default().save_to_file("settings.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
