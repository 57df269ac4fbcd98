use std::path::{Path, PathBuf};

use creative_utils_api::GameMode;
use serde::Deserialize;
use thiserror::Error;

use crate::world::Difficulty;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub logging: LoggingSection,
    /// Players joined automatically at startup.
    #[serde(default)]
    pub players: Vec<PlayerEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_plugins_directory")]
    pub plugins_directory: String,
}

fn default_name() -> String {
    "CreativeUtils host".into()
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_plugins_directory() -> String {
    "plugins".into()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            tick_interval_ms: default_tick_interval_ms(),
            plugins_directory: default_plugins_directory(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    /// Starting time of day in ticks (0-23999).
    #[serde(default)]
    pub time: i64,
    #[serde(default = "default_gamemode")]
    pub default_gamemode: GameMode,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Normal
}

fn default_gamemode() -> GameMode {
    GameMode::Survival
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            time: 0,
            default_gamemode: default_gamemode(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    pub gamemode: Option<GameMode>,
}

impl HostConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`HostConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
