// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[editor]` - Mask brush settings
//! - `[crop]` - Crop rasterization (resampling filter, density, surface limit)
//! - `[diagnostics]` - Diagnostic event buffer
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass a directory to `load_with_override()`/`save_with_override()`
//! 3. Set `RETOUCH_LENS_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use retouch_lens::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.editor.brush_radius = Some(24);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::diagnostics::BufferCapacity;
use crate::domain::editing::{BrushRadius, DevicePixelRatio};
use crate::error::{Error, Result};
use image_rs::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Application name used for directory naming.
const APP_NAME: &str = "RetouchLens";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "RETOUCH_LENS_CONFIG_DIR";

// =============================================================================
// Enums
// =============================================================================

/// Resampling filter used by the crop rasterizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Returns the matching `image` crate filter.
    #[must_use]
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

// =============================================================================
// Section Structs
// =============================================================================

/// Editing surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Initial magic-fill brush radius in rendered pixels.
    #[serde(
        default = "default_brush_radius",
        skip_serializing_if = "Option::is_none"
    )]
    pub brush_radius: Option<u32>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            brush_radius: default_brush_radius(),
        }
    }
}

/// Crop rasterization settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropConfig {
    /// Resampling filter for the natural-to-output blit.
    #[serde(default)]
    pub filter: ResampleFilter,

    /// Density used when the host does not report one.
    #[serde(
        default = "default_device_pixel_ratio",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_pixel_ratio: Option<f32>,

    /// Largest output width or height the rasterizer will allocate.
    #[serde(
        default = "default_max_output_dimension",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_output_dimension: Option<u32>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::default(),
            device_pixel_ratio: default_device_pixel_ratio(),
            max_output_dimension: default_max_output_dimension(),
        }
    }
}

/// Diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Number of events kept in memory.
    #[serde(
        default = "default_buffer_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer_capacity: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Crate configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub crop: CropConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Config {
    /// Brush radius, validated.
    #[must_use]
    pub fn brush_radius(&self) -> BrushRadius {
        self.editor
            .brush_radius
            .map_or_else(BrushRadius::default, BrushRadius::new)
    }

    /// Fallback device pixel ratio, validated.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> DevicePixelRatio {
        self.crop
            .device_pixel_ratio
            .map_or_else(DevicePixelRatio::default, DevicePixelRatio::new)
    }

    /// Maximum output surface dimension, never below [`MIN_MAX_OUTPUT_DIMENSION`].
    #[must_use]
    pub fn max_output_dimension(&self) -> u32 {
        self.crop
            .max_output_dimension
            .unwrap_or(DEFAULT_MAX_OUTPUT_DIMENSION)
            .max(MIN_MAX_OUTPUT_DIMENSION)
    }

    /// Diagnostics buffer capacity, validated.
    #[must_use]
    pub fn buffer_capacity(&self) -> BufferCapacity {
        self.diagnostics
            .buffer_capacity
            .map_or_else(BufferCapacity::default, BufferCapacity::new)
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_brush_radius() -> Option<u32> {
    Some(DEFAULT_BRUSH_RADIUS)
}

fn default_device_pixel_ratio() -> Option<f32> {
    Some(DEFAULT_DEVICE_PIXEL_RATIO)
}

fn default_max_output_dimension() -> Option<u32> {
    Some(DEFAULT_MAX_OUTPUT_DIMENSION)
}

fn default_buffer_capacity() -> Option<usize> {
    Some(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config directory, honoring the explicit override first, then
/// [`ENV_CONFIG_DIR`], then the platform default.
pub fn config_dir_with_override(override_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_dir {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            return match load_from_path(&path) {
                Ok(config) => (config, None),
                Err(err) => (
                    Config::default(),
                    Some(format!("Ignoring {}: {err}", path.display())),
                ),
            };
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostics::buffer_capacity_bounds;
    use crate::domain::editing::newtypes::brush_bounds;
    use tempfile::tempdir;

    // Verify domain bounds match config constants
    #[test]
    fn domain_bounds_match_config() {
        assert_eq!(brush_bounds::MIN, MIN_BRUSH_RADIUS);
        assert_eq!(brush_bounds::MAX, MAX_BRUSH_RADIUS);
        assert_eq!(brush_bounds::DEFAULT, DEFAULT_BRUSH_RADIUS);
        assert_eq!(buffer_capacity_bounds::MIN, MIN_DIAGNOSTICS_BUFFER_CAPACITY);
        assert_eq!(buffer_capacity_bounds::MAX, MAX_DIAGNOSTICS_BUFFER_CAPACITY);
        assert_eq!(
            buffer_capacity_bounds::DEFAULT,
            DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY
        );
    }

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            editor: EditorConfig {
                brush_radius: Some(12),
            },
            crop: CropConfig {
                filter: ResampleFilter::CatmullRom,
                device_pixel_ratio: Some(2.0),
                max_output_dimension: Some(4096),
            },
            diagnostics: DiagnosticsConfig {
                buffer_capacity: Some(250),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn load_with_override_falls_back_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[crop]\nfilter = 42\n")
            .expect("failed to write config");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn load_with_override_missing_file_is_silent_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[crop]\nfilter = \"nearest\"\n").expect("failed to write config");

        let loaded = load_from_path(&config_path).expect("failed to load config");
        assert_eq!(loaded.crop.filter, ResampleFilter::Nearest);
        assert_eq!(loaded.crop.max_output_dimension, Some(DEFAULT_MAX_OUTPUT_DIMENSION));
        assert_eq!(loaded.editor, EditorConfig::default());
    }

    #[test]
    fn accessors_validate_raw_values() {
        let config = Config {
            editor: EditorConfig {
                brush_radius: Some(0),
            },
            crop: CropConfig {
                filter: ResampleFilter::default(),
                device_pixel_ratio: Some(0.1),
                max_output_dimension: Some(1),
            },
            diagnostics: DiagnosticsConfig {
                buffer_capacity: Some(1),
            },
        };
        assert_eq!(config.brush_radius().value(), MIN_BRUSH_RADIUS);
        assert_eq!(config.device_pixel_ratio(), DevicePixelRatio::default());
        assert_eq!(config.max_output_dimension(), MIN_MAX_OUTPUT_DIMENSION);
        assert_eq!(
            config.buffer_capacity().value(),
            MIN_DIAGNOSTICS_BUFFER_CAPACITY
        );
    }

    #[test]
    fn default_filter_is_high_quality() {
        assert_eq!(Config::default().crop.filter, ResampleFilter::Lanczos3);
        assert!(matches!(
            ResampleFilter::Lanczos3.filter_type(),
            FilterType::Lanczos3
        ));
    }
}
