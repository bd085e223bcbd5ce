use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use engine::{DEFAULT_TICK_RATE_TPS, game::GameConfig};
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
  pub game: Option<GameConfig>,
  pub tower: Option<TowerConfig>,
}

impl Config {
  pub fn from_path<T>(path: T) -> Result<Self, Error>
  where
    T: AsRef<Path>,
  {
    let path = path.as_ref();
    let config =
      std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
        path: path.to_path_buf(),
        source,
      })?;

    toml::from_str(&config).map_err(|source| Error::ParseConfig {
      path: path.to_path_buf(),
      source,
    })
  }

  /// The config in the user's config directory, if there is one.
  pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "radar")
      .map(|dirs| dirs.config_dir().join("config.toml"))
      .filter(|path| path.exists())
  }

  pub fn game(&self) -> GameConfig {
    self.game.unwrap_or_default()
  }

  pub fn tower(&self) -> TowerConfig {
    self.tower.clone().unwrap_or_default()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TowerConfig {
  pub tick_rate: Option<usize>,
  pub seed: Option<u64>,
  /// Also write logs to `tower.log` in this directory.
  pub log_dir: Option<PathBuf>,
}

impl TowerConfig {
  pub fn tick_rate(&self) -> usize {
    self.tick_rate.unwrap_or(DEFAULT_TICK_RATE_TPS).max(1)
  }
}
