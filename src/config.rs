use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Idle window for search-as-you-type coalescing, in milliseconds.
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_api_url")]
  pub url: String,
  /// Quote currency for market prices (e.g. "usd", "eur")
  #[serde(default = "default_currency")]
  pub currency: String,
  /// Coins per market page
  #[serde(default = "default_per_page")]
  pub per_page: u32,
}

fn default_api_url() -> String {
  "https://api.coingecko.com/api/v3".to_string()
}

fn default_currency() -> String {
  "usd".to_string()
}

fn default_per_page() -> u32 {
  50
}

fn default_debounce_ms() -> u64 {
  500
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: default_api_url(),
      currency: default_currency(),
      per_page: default_per_page(),
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      debounce_ms: default_debounce_ms(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./coinwatch.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/coinwatch/config.yaml
  ///
  /// The public market API needs no credentials, so a missing config file
  /// falls back to the built-in defaults.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(Error::Config(format!(
          "config file not found: {}",
          p.display()
        )));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("coinwatch.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("coinwatch").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
      Error::Config(format!("failed to read config file {}: {}", path.display(), e))
    })?;

    serde_yaml::from_str(&contents).map_err(|e| {
      Error::Config(format!("failed to parse config file {}: {}", path.display(), e))
    })
  }

  /// Get the market API key from environment variables, if set.
  ///
  /// Checks COINWATCH_API_KEY first, then COINGECKO_API_KEY as fallback.
  /// The public API works without one at a lower rate limit.
  pub fn get_api_key() -> Option<String> {
    std::env::var("COINWATCH_API_KEY")
      .or_else(|_| std::env::var("COINGECKO_API_KEY"))
      .ok()
      .filter(|key| !key.is_empty())
  }
}
