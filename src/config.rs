use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::source::DEFAULT_LATENCY;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "CATALOG_LOG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Refresh a dirty cache from the remote service. When off, remote writes are best-effort.
  pub use_remote: bool,
  pub remote: RemoteConfig,
  pub store: StoreConfig,
  pub log: LogConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      use_remote: true,
      remote: RemoteConfig::default(),
      store: StoreConfig::default(),
      log: LogConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
  /// Simulated round trip for remote reads, in milliseconds
  pub latency_ms: u64,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      latency_ms: DEFAULT_LATENCY.as_millis() as u64,
    }
  }
}

impl RemoteConfig {
  pub fn latency(&self) -> Duration {
    Duration::from_millis(self.latency_ms)
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Local database file (defaults to the platform data directory)
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// `tracing_subscriber::EnvFilter` directive
  pub filter: String,
  /// Write daily-rolling log files here instead of stderr
  pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      filter: "catalog=info".to_string(),
      directory: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./catalog.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/catalog/config.yaml
  ///
  /// Defaults apply when no file is found.
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

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("catalog.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("catalog").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    // An empty document deserializes to null rather than an empty map.
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Same configuration with the remote refresh turned off when `offline` is set.
  pub fn with_offline(self, offline: bool) -> Self {
    if offline {
      Self {
        use_remote: false,
        ..self
      }
    } else {
      self
    }
  }

  /// Log filter, taking `CATALOG_LOG` over the configured value.
  pub fn log_filter(&self) -> String {
    std::env::var(LOG_ENV).unwrap_or_else(|_| self.log.filter.clone())
  }
}
