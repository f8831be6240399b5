use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::cache::SqliteStorage;

const DEFAULT_API_URL: &str = "https://jsonblob.com/api/1151549092634943488";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Path of the SQLite cache (defaults to $XDG_DATA_HOME/dogview/dogs_db.sqlite)
  pub database: Option<PathBuf>,
  /// Log filter used when RUST_LOG is not set
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_api_url")]
  pub url: Url,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      database: None,
      log_level: default_log_level(),
    }
  }
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: default_api_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_api_url() -> Url {
  Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

fn default_timeout_secs() -> u64 {
  30
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./dogview.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/dogview/config.yaml
  ///
  /// Without any file the defaults are used. `DOGVIEW_API_URL` overrides
  /// the endpoint in every case.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    config.with_env_overrides()
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("dogview.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("dogview").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  fn with_env_overrides(mut self) -> Result<Self> {
    if let Ok(url) = std::env::var("DOGVIEW_API_URL") {
      self.api.url =
        Url::parse(&url).map_err(|e| eyre!("Invalid DOGVIEW_API_URL '{}': {}", url, e))?;
    }
    Ok(self)
  }

  /// Resolve the cache database path.
  pub fn database_path(&self) -> Result<PathBuf> {
    match &self.database {
      Some(path) => Ok(path.clone()),
      None => SqliteStorage::default_path()
        .ok_or_else(|| eyre!("Could not determine data directory")),
    }
  }
}
