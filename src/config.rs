//! Configuration file support for screenspan.
//!
//! Loads settings from ~/.config/screenspan/config.toml if it exists,
//! otherwise uses sensible defaults.
//!
//! Also provides `LayoutOptions` - the runtime options consumed by the
//! layout engine.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::SplitKind;

// =============================================================================
// Runtime Options (resolved values)
// =============================================================================

/// Runtime options for the layout engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Regions narrower or shorter than this are merged into a neighbour (0 disables)
    pub min_region_size: i32,
    /// Region capacity offered on the first query
    pub initial_capacity: usize,
    /// How many times a query may ask for a larger buffer
    pub max_query_retries: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            min_region_size: 0,
            initial_capacity: 2,
            max_query_retries: 4,
        }
    }
}

// =============================================================================
// File-based Configuration (TOML parsing)
// =============================================================================

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub emulation: EmulationConfig,
    pub presenter: PresenterConfig,
}

/// Layout engine settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_region_size: u32,
    pub initial_capacity: usize,
    pub max_query_retries: usize,
}

/// Emulation applied at startup
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmulationConfig {
    /// Number of emulated screens (0 = off)
    pub screens: u32,
    pub split: SplitConfig,
}

/// Split direction for config parsing and the command line
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplitConfig {
    #[default]
    None,
    Vertical,
    Horizontal,
}

impl From<SplitConfig> for SplitKind {
    fn from(split: SplitConfig) -> Self {
        match split {
            SplitConfig::None => SplitKind::None,
            SplitConfig::Vertical => SplitKind::Vertical,
            SplitConfig::Horizontal => SplitKind::Horizontal,
        }
    }
}

/// Status element placement used by the demo presenter
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    pub margin: i32,
    pub status_height: i32,
}

impl Config {
    /// Load config from default path (~/.config/screenspan/config.toml)
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("screenspan")
            .join("config.toml")
    }

    /// Load config from a specific path
    pub fn load_from_path(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Resolve the layout section into engine options
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            min_region_size: self.layout.min_region_size.min(i32::MAX as u32) as i32,
            initial_capacity: self.layout.initial_capacity.max(2),
            max_query_retries: self.layout.max_query_retries,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let options = LayoutOptions::default();
        Self {
            min_region_size: options.min_region_size as u32,
            initial_capacity: options.initial_capacity,
            max_query_retries: options.max_query_retries,
        }
    }
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            margin: 5,
            status_height: 20,
        }
    }
}
