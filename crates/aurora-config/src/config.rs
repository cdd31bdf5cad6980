//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World-scale inputs used to size the sky.
    pub world: WorldConfig,
    /// Day/night cycle and celestial tuning.
    pub sky: SkyConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World-scale settings. The sky only uses these to size orbits and the
/// background shell so it always encloses the playable volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Render distance in chunks.
    pub render_distance: u32,
    /// Edge length of one chunk in world units.
    pub chunk_size: f32,
}

impl WorldConfig {
    /// Distance in world units covered by the render distance.
    pub fn view_extent(&self) -> f32 {
        self.render_distance as f32 * self.chunk_size
    }
}

/// Day/night cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyConfig {
    /// Length of one full day/night cycle in minutes.
    pub cycle_minutes: f32,
    /// Normalized time of day at startup (0 = midnight, 0.25 = sunrise).
    pub start_time: f32,
    /// Multiplier applied to every frame delta (0 pauses the clock).
    pub time_scale: f32,
    /// Background shell radius as a fraction of the view extent.
    pub shell_radius_factor: f32,
    /// Sun tuning.
    pub sun: BodyConfig,
    /// Moon tuning.
    pub moon: BodyConfig,
    /// Star layer tuning.
    pub stars: StarConfig,
}

/// Per-body orbit and sprite tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Orbital path radius as a fraction of the view extent.
    pub radius_factor: f32,
    /// Billboard edge length as a fraction of the orbital radius.
    pub size_factor: f32,
    /// Texture path handed to the texture loader.
    pub texture: String,
    /// Brightness on the horizon. Below 0.01 the body is hidden there.
    pub intensity_floor: f32,
    /// Brightness at the top of the arc.
    pub intensity_peak: f32,
}

/// Star layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarConfig {
    /// Seed for the deterministic star catalog.
    pub seed: u64,
    /// Number of stars in the catalog.
    pub count: u32,
    /// Star sphere radius as a fraction of the view extent.
    pub radius_factor: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            render_distance: 8,
            chunk_size: 16.0,
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            cycle_minutes: 20.0,
            start_time: 0.25,
            time_scale: 1.0,
            shell_radius_factor: 0.95,
            sun: BodyConfig {
                radius_factor: 0.8,
                size_factor: 0.12,
                texture: "textures/sun.png".to_string(),
                intensity_floor: 0.25,
                intensity_peak: 1.0,
            },
            moon: BodyConfig {
                radius_factor: 0.75,
                size_factor: 0.08,
                texture: "textures/moon.png".to_string(),
                intensity_floor: 0.15,
                intensity_peak: 0.6,
            },
            stars: StarConfig::default(),
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius_factor: 0.8,
            size_factor: 0.1,
            texture: String::new(),
            intensity_floor: 0.2,
            intensity_peak: 1.0,
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            seed: 0x5ee_d5ca1e,
            count: 1500,
            radius_factor: 0.9,
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

/// Platform config directory for Aurora (`~/.config/aurora` on Linux).
///
/// Falls back to the working directory when the platform reports none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("aurora"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .map_err(|source| ConfigError::read(&config_path, source))?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
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
        std::fs::create_dir_all(config_dir)
            .map_err(|source| ConfigError::write(config_dir, source))?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized)
            .map_err(|source| ConfigError::write(&config_path, source))?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path)
            .map_err(|source| ConfigError::read(&config_path, source))?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
