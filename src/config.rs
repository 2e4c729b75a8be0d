use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::flood_fill::DEFAULT_TOLERANCE;
use crate::history::DEFAULT_CAPACITY;
use crate::tools::{ToolSettings, ToolType};

/// Environment variable naming a JSON file with a [`SurfaceConfig`].
pub const CONFIG_ENV_VAR: &str = "CANVAS_DRAW_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Startup options for a drawing surface. Every field has a default, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub brush_size: u32,
    pub brush_color: Rgb,
    pub fill_color: Rgb,
    pub background: Rgb,
    pub history_capacity: usize,
    /// Canvas height; the width follows the hosting panel.
    pub canvas_height: u32,
    pub fill_tolerance: u8,
    pub jpeg_quality: u8,
    pub export_dir: PathBuf,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        let tools = ToolSettings::default();
        Self {
            brush_size: tools.brush_size(),
            brush_color: tools.brush_color,
            fill_color: tools.fill_color,
            background: Rgb::new(0x0F, 0x17, 0x2A),
            history_capacity: DEFAULT_CAPACITY,
            canvas_height: 400,
            fill_tolerance: DEFAULT_TOLERANCE,
            jpeg_quality: 90,
            export_dir: PathBuf::from("."),
        }
    }
}

impl SurfaceConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str::<Self>(json)?.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], falling back to the
    /// defaults when it is unset or unreadable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(err) => {
                log::warn!("{err}; using default config");
                Self::default()
            }
        }
    }

    /// Bring out-of-range values back into range.
    pub fn sanitized(mut self) -> Self {
        self.brush_size = self.tool_settings().brush_size();
        self.history_capacity = self.history_capacity.max(1);
        self.canvas_height = self.canvas_height.max(1);
        self.fill_tolerance = self.fill_tolerance.max(1);
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }

    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings::new(ToolType::default(), self.brush_size, self.brush_color, self.fill_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SurfaceConfig::default();
        assert_eq!(config.brush_size, 5);
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.canvas_height, 400);
        assert_eq!(config.background.to_hex(), "#0F172A");
        assert_eq!(config.brush_color.to_hex(), "#00D9FF");
        assert_eq!(config.fill_color.to_hex(), "#A855F7");
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = SurfaceConfig::from_json(r##"{"brush_size": 12, "background": "#FFFFFF"}"##).unwrap();
        assert_eq!(config.brush_size, 12);
        assert_eq!(config.background, Rgb::WHITE);
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = SurfaceConfig::from_json(
            r#"{"brush_size": 0, "history_capacity": 0, "jpeg_quality": 0, "fill_tolerance": 0}"#,
        )
        .unwrap();
        assert_eq!(config.brush_size, 1);
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.jpeg_quality, 1);
        assert_eq!(config.fill_tolerance, 1);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        assert!(matches!(
            SurfaceConfig::from_json(r#"{"brush_color": "blue"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SurfaceConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
