use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::constants::constants;

/// User preferences persisted in `prefs.toml`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Override for the Data API base URL.
  pub api_base: Option<String>,
  /// Where rendered pages are written.
  pub output_dir: Option<String>,
  /// Request timeout. Unset means requests may hang indefinitely.
  pub request_timeout_secs: Option<u64>,
}

pub fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "ytweb")
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = project_dirs() {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file)
        && let Ok(config) = toml::from_str(&content)
      {
        return config;
      }
    }
    Self::default()
  }

  pub fn save(&self) -> anyhow::Result<PathBuf> {
    let proj_dirs = project_dirs().context("Could not determine a config directory")?;
    let config_dir = proj_dirs.config_dir();
    std::fs::create_dir_all(config_dir)
      .with_context(|| format!("Failed to create config directory {}", config_dir.display()))?;
    let config_file = config_dir.join("prefs.toml");
    let content = toml::to_string(self).context("Failed to serialize preferences")?;
    std::fs::write(&config_file, content).with_context(|| format!("Failed to write {}", config_file.display()))?;
    Ok(config_file)
  }

  pub fn api_base(&self) -> &str {
    self.api_base.as_deref().map(|s| s.trim_end_matches('/')).unwrap_or(&constants().api_base)
  }

  pub fn request_timeout(&self) -> Option<Duration> {
    self.request_timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
  }

  /// Output directory: explicit override, then preference, then `<data dir>/site`.
  pub fn output_dir(&self, cli_override: Option<PathBuf>) -> Option<PathBuf> {
    cli_override
      .or_else(|| self.output_dir.as_ref().map(PathBuf::from))
      .or_else(|| project_dirs().map(|d| d.data_dir().join("site")))
  }
}

/// Location of the key-value storage file.
pub fn storage_path() -> Option<PathBuf> {
  project_dirs().map(|d| d.data_dir().join(&constants().storage_file))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn api_base_defaults_to_constant() {
    assert_eq!(Config::default().api_base(), "https://www.googleapis.com/youtube/v3");
  }

  #[test]
  fn api_base_override_drops_trailing_slash() {
    let config = Config { api_base: Some("http://127.0.0.1:9000/v3/".to_string()), ..Default::default() };
    assert_eq!(config.api_base(), "http://127.0.0.1:9000/v3");
  }

  #[test]
  fn zero_timeout_means_none() {
    let config = Config { request_timeout_secs: Some(0), ..Default::default() };
    assert_eq!(config.request_timeout(), None);
    let config = Config { request_timeout_secs: Some(15), ..Default::default() };
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
  }

  #[test]
  fn output_dir_precedence() {
    let config = Config { output_dir: Some("/tmp/prefs-site".to_string()), ..Default::default() };
    assert_eq!(config.output_dir(Some(PathBuf::from("/tmp/cli"))), Some(PathBuf::from("/tmp/cli")));
    assert_eq!(config.output_dir(None), Some(PathBuf::from("/tmp/prefs-site")));
  }

  #[test]
  fn prefs_toml_round_trip_partial() {
    let config: Config = toml::from_str("output_dir = \"site\"\n").unwrap();
    assert_eq!(config.output_dir.as_deref(), Some("site"));
    assert_eq!(config.api_base, None);
  }
}
