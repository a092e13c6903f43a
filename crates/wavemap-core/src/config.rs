//! # Configuration System
//!
//! Provides YAML-based configuration for wavemap applications, including:
//!
//! - Grid geometry (resolution, room size, wavelength)
//! - Cosine table settings for synthesis
//! - Regulatory scaling options
//! - Scene defaults (initial emitters, random seed)
//! - Status refresh debounce interval
//! - Logging
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `WAVEMAP_CONFIG` environment variable
//! 2. `./wavemap.yaml` (current directory)
//! 3. `~/.config/wavemap/config.yaml` (user config)
//! 4. `/etc/wavemap/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! grid:
//!   width: 200
//!   height: 200
//!   room_size_m: 25.0
//!   wavelength_m: 0.125
//!
//! table:
//!   enable: true
//!   scale_factor: 32768.0
//!
//! regulatory:
//!   antenna_gain_penalty: true
//!
//! scene:
//!   default_emitters: 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::accumulator::RegulatoryConfig;
use crate::cosine_table::{CosineTable, MAX_WRAP_LEN};
use crate::grid::GridSpec;
use crate::observe::LogConfig;
use crate::MAX_EMITTERS;

/// Error type for configuration operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("config not found: {0}")]
    NotFound(String),
    /// Failed to read or write configuration file
    #[error("failed to read config: {0}")]
    ReadError(String),
    /// Failed to parse configuration
    #[error("failed to parse config: {0}")]
    ParseError(String),
    /// Invalid configuration value
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Grid geometry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells along x
    pub width: usize,
    /// Cells along y
    pub height: usize,
    /// Physical extent mapped onto the grid, in meters
    pub room_size_m: f64,
    /// Carrier wavelength in meters
    pub wavelength_m: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        let grid = GridSpec::default();
        Self {
            width: grid.width(),
            height: grid.height(),
            room_size_m: grid.room_size_m(),
            wavelength_m: grid.wavelength_m(),
        }
    }
}

/// Cosine table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Use table lookup instead of direct cos/sin
    pub enable: bool,
    /// Samples per meter of wavelength; `floor(scale_factor * wavelength_m)`
    /// samples cover one period
    pub scale_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            enable: true,
            scale_factor: 32_768.0, // 4096 samples at 2.4 GHz
        }
    }
}

/// Scene defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Emitters activated at startup (slots `0..default_emitters`)
    pub default_emitters: usize,
    /// Seed for phase randomization
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            default_emitters: 3,
            seed: 42,
        }
    }
}

/// Receiver status refresh configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Quiet period before receiver statistics are refreshed, in milliseconds
    pub refresh_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { refresh_ms: 100 }
    }
}

/// Complete wavemap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavemapConfig {
    /// Configuration version
    pub version: String,
    /// Grid geometry
    pub grid: GridConfig,
    /// Cosine table
    pub table: TableConfig,
    /// Regulatory scaling
    pub regulatory: RegulatoryConfig,
    /// Scene defaults
    pub scene: SceneConfig,
    /// Status refresh
    pub status: StatusConfig,
    /// Logging
    pub logging: LogConfig,
}

impl Default for WavemapConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            grid: GridConfig::default(),
            table: TableConfig::default(),
            regulatory: RegulatoryConfig::default(),
            scene: SceneConfig::default(),
            status: StatusConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl WavemapConfig {
    /// Load configuration from the default search path.
    ///
    /// Search order:
    /// 1. `WAVEMAP_CONFIG` environment variable
    /// 2. `./wavemap.yaml`
    /// 3. `~/.config/wavemap/config.yaml`
    /// 4. `/etc/wavemap/config.yaml`
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("WAVEMAP_CONFIG") {
            let path = Path::new(&path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Self::load_from(path);
        }

        for path in &Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./wavemap.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "wavemap") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/wavemap/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid_spec()?;

        if self.table.enable {
            if !(self.table.scale_factor.is_finite() && self.table.scale_factor > 0.0) {
                return Err(ConfigError::ValidationError(
                    "table.scale_factor must be positive".to_string(),
                ));
            }
            let len = CosineTable::requested_len(self.table.scale_factor, self.grid.wavelength_m);
            if len > MAX_WRAP_LEN {
                return Err(ConfigError::ValidationError(format!(
                    "table.scale_factor gives {} samples per period, at most {} allowed",
                    len, MAX_WRAP_LEN
                )));
            }
        }

        if self.scene.default_emitters > MAX_EMITTERS {
            return Err(ConfigError::ValidationError(format!(
                "scene.default_emitters must be at most {}",
                MAX_EMITTERS
            )));
        }

        Ok(())
    }

    /// Grid described by the `grid` section.
    pub fn grid_spec(&self) -> Result<GridSpec, ConfigError> {
        GridSpec::new(
            self.grid.width,
            self.grid.height,
            self.grid.room_size_m,
            self.grid.wavelength_m,
        )
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Cosine table for the configured wavelength, if enabled.
    pub fn cosine_table(&self) -> Option<CosineTable> {
        self.table
            .enable
            .then(|| CosineTable::build(self.table.scale_factor, self.grid.wavelength_m))
    }

    /// Status refresh interval.
    pub fn status_refresh(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.status.refresh_ms)
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            regulatory: RegulatoryConfig {
                antenna_gain_penalty: true,
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
