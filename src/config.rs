use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::params::Settings;

/// User configuration, `~/.config/conga-facts/config.yml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub target_path: String,
    pub model_file: String,
    pub host: String,
    /// Log filter used when neither `--log-level` nor `CONGA_FACTS_LOG` is set
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            target_path: settings.target_path,
            model_file: settings.model_file,
            host: settings.host,
            log_level: None,
        }
    }
}

impl From<Config> for Settings {
    fn from(config: Config) -> Self {
        Settings {
            target_path: config.target_path,
            model_file: config.model_file,
            host: config.host,
        }
    }
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# conga-facts configuration
# Task arguments and variables override these values

# Directory below conga_basedir holding the generated configuration
target_path: target/configuration

# Name of the model file inside the node directory
model_file: model.yaml

# Host whose variables define conga_basedir
host: localhost

# Log filter, overridden by --log-level and CONGA_FACTS_LOG (uncomment to set)
# log_level: info
"#;

impl Config {
    fn config_path() -> Option<PathBuf> {
        dirs_or_home().map(|p| p.join("config.yml"))
    }

    /// Load from `path`, or from the default location. A missing default
    /// config is created with commented defaults.
    ///
    /// Runs before logging is set up, so failures are returned for the
    /// caller to report once the subscriber exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Some(p) => {
                    if !p.exists() {
                        Self::create_default(&p);
                        return Ok(Self::default());
                    }
                    p
                }
                None => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Best effort, an unwritable home just means running on defaults.
    fn create_default(path: &Path) {
        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let _ = fs::write(path, DEFAULT_CONFIG_CONTENT);
    }
}

fn dirs_or_home() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("conga-facts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_matches_defaults() {
        assert_eq!(Config::parse(DEFAULT_CONFIG_CONTENT).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("model_file: conga-model.yaml\n").unwrap();
        assert_eq!(config.model_file, "conga-model.yaml");
        assert_eq!(config.target_path, "target/configuration");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_log_level() {
        let config = Config::parse("log_level: debug\n").unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "host: build01\n").unwrap();
        let settings: Settings = Config::load(Some(path.as_path())).unwrap().into();
        assert_eq!(settings.host, "build01");
    }

    #[test]
    fn test_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "host: [unclosed").unwrap();
        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse config"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().starts_with("failed to read config"));
    }
}
