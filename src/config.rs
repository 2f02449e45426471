//! Configuration system
//!
//! All settings live in one TOML file. Every field is optional; anything
//! left out keeps the built-in default.
//!
//! ```toml
//! [window]
//! title = "Living room"
//! vsync = true
//!
//! [room]
//! width = 600.0
//!
//! [[catalog]]
//! name = "Chair"
//! path = "assets/models/chair.obj"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gfx::scene::RoomDimensions;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Room Planner".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub damping: f32,
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Fraction of the orbit distance per wheel line
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Largest angle between +Y and the view direction, in radians
    pub max_polar_angle: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near: 0.1,
            far: 2000.0,
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 50.0,
            max_distance: 1500.0,
            max_polar_angle: std::f32::consts::PI / 2.1,
        }
    }
}

/// A model offered in the catalog panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: PathBuf,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPlanConfig {
    pub window: WindowConfig,
    pub room: RoomDimensions,
    pub camera: CameraConfig,
    pub catalog: Vec<CatalogEntry>,
}

impl Default for RoomPlanConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            room: RoomDimensions::default(),
            camera: CameraConfig::default(),
            catalog: vec![
                CatalogEntry::new("Chair", "assets/models/chair.obj"),
                CatalogEntry::new("Table", "assets/models/table.obj"),
            ],
        }
    }
}

impl RoomPlanConfig {
    /// Reads `path` when given, otherwise returns the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let room = &self.room;
        if room.width <= 0.0 || room.depth <= 0.0 || room.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "room dimensions must be positive, got {}x{}x{}",
                room.width, room.depth, room.height
            )));
        }

        let camera = &self.camera;
        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(ConfigError::Invalid(format!(
                "camera clip range {}..{} is empty",
                camera.near, camera.far
            )));
        }
        if camera.min_distance > camera.max_distance {
            return Err(ConfigError::Invalid(
                "camera min_distance exceeds max_distance".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_path_uses_defaults() {
        let config = RoomPlanConfig::load(None).unwrap();
        assert_eq!(config, RoomPlanConfig::default());
        assert_eq!(config.room.width, 500.0);
        assert_eq!(config.catalog.len(), 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = RoomPlanConfig::from_toml_str(
            r#"
            [room]
            width = 600.0

            [window]
            vsync = false

            [[catalog]]
            name = "Sofa"
            path = "models/sofa.obj"
            "#,
        )
        .unwrap();

        assert_eq!(config.room.width, 600.0);
        assert_eq!(config.room.depth, 400.0);
        assert!(!config.window.vsync);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.catalog, vec![CatalogEntry::new("Sofa", "models/sofa.obj")]);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera]\ndamping = 0.1").unwrap();

        let config = RoomPlanConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.camera.damping, 0.1);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RoomPlanConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            RoomPlanConfig::from_toml_str("[room]\nheight = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RoomPlanConfig::from_toml_str("[camera]\nnear = 10.0\nfar = 5.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RoomPlanConfig::from_toml_str("[room]\nwidth = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = RoomPlanConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(RoomPlanConfig::from_toml_str(&text).unwrap(), config);
    }
}
