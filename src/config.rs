//! Board configuration.
//!
//! Stored as JSON. Every field has a default so partial files are accepted;
//! `TIMELINE_BOARD_CONFIG` points the binaries at a file.

use crate::geometry::Zoom;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "TIMELINE_BOARD_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Pixels per day on startup
    #[serde(default = "default_initial_zoom")]
    pub initial: f64,
    #[serde(default = "default_zoom_step")]
    pub step: f64,
    /// Zoom-out floor
    #[serde(default = "default_min_zoom")]
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Pointer travel (px) a press must exceed before it becomes a drag
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_lane_height")]
    pub lane_height: f64,
    /// Extra canvas height below the last lane
    #[serde(default = "default_canvas_padding")]
    pub canvas_padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Opaque key the item record is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// JSON file backing the record; in-memory only when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_initial_zoom() -> f64 {
    12.0
}

fn default_zoom_step() -> f64 {
    5.0
}

fn default_min_zoom() -> f64 {
    5.0
}

fn default_activation_distance() -> f64 {
    8.0
}

fn default_lane_height() -> f64 {
    120.0
}

fn default_canvas_padding() -> f64 {
    80.0
}

fn default_storage_key() -> String {
    "timelineItems".to_string()
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            initial: default_initial_zoom(),
            step: default_zoom_step(),
            min: default_min_zoom(),
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: default_activation_distance(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lane_height: default_lane_height(),
            canvas_padding: default_canvas_padding(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            path: None,
        }
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be a positive number (got {value})"
        )))
    }
}

impl BoardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: BoardConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Loads the file named by `TIMELINE_BOARD_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("zoom.initial", self.zoom.initial)?;
        require_positive("zoom.step", self.zoom.step)?;
        require_positive("zoom.min", self.zoom.min)?;
        require_positive("drag.activation_distance", self.drag.activation_distance)?;
        require_positive("layout.lane_height", self.layout.lane_height)?;
        if !self.layout.canvas_padding.is_finite() || self.layout.canvas_padding < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "layout.canvas_padding must be zero or positive (got {})",
                self.layout.canvas_padding
            )));
        }
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.key must not be empty".into()));
        }
        Ok(())
    }

    pub fn initial_zoom(&self) -> Result<Zoom, ConfigError> {
        Zoom::new(self.zoom.initial).map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}
