//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain size and noise parameters.
    pub terrain: TerrainConfig,
    /// Grass and tree decoration settings.
    pub decoration: DecorationConfig,
    /// Export location and encoding settings.
    pub export: ExportConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain footprint and fractal noise parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Footprint width. The sampling grid is `max(width, height)` per side.
    pub width: i32,
    /// Footprint depth.
    pub height: i32,
    /// Noise periods across the grid at the first octave.
    pub scale: f64,
    /// Horizontal noise offset.
    pub offset_x: f64,
    /// Vertical noise offset.
    pub offset_y: f64,
    /// Octave count (1-10).
    pub octaves: u32,
    /// Amplitude decay per octave (0.0 - 1.0).
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
    /// Factor applied to every normalized height.
    pub height_multiplier: f32,
    /// Perlin permutation seed.
    pub seed: u32,
    /// Sample rows on worker threads.
    pub parallel: bool,
}

/// Decoration toggles and the resources they need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorationConfig {
    /// Paint the grass detail layer.
    pub add_grass: bool,
    /// Scatter trees.
    pub add_trees: bool,
    /// Configured tree count.
    pub tree_count: u32,
    /// Place `tree_count` trees instead of the fixed historical count.
    pub honor_tree_count: bool,
    /// Seed for tree placement. `None` draws fresh entropy on every run.
    pub placement_seed: Option<u64>,
    /// Grass texture identifier. Grass is skipped when unset.
    pub grass_texture: Option<String>,
    /// Tree prefab identifier. Trees are skipped when unset.
    pub tree_prefab: Option<String>,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Root under which `Exports/` is created. `None` = platform data dir.
    pub root: Option<PathBuf>,
    /// Handling of heights outside `[0, 1]`: "clamp", "rescale" or "reject".
    pub range_policy: String,
    /// Show the written file in the platform file manager.
    pub reveal_after_export: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            scale: 15.0,
            offset_x: 350.0,
            offset_y: 780.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.2,
            height_multiplier: 2.5,
            seed: 0,
            parallel: false,
        }
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            add_grass: false,
            add_trees: false,
            tree_count: 1,
            honor_tree_count: false,
            placement_seed: None,
            grass_texture: None,
            tree_prefab: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root: None,
            range_policy: "clamp".to_string(),
            reveal_after_export: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })?;
        Ok(())
    }

    /// Re-read the file: returns `Some(new_config)` if it changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
