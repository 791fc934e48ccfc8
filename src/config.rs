//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/zcalc/config.toml` (or the platform
//! equivalent) unless a path is given on the command line. A missing file
//! means defaults.

use crate::calculator::{
    Calculator, DEFAULT_HISTORY_CAPACITY, DEFAULT_SIGNIFICANT_DIGITS, MAX_SIGNIFICANT_DIGITS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "zcalc";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of past calculations to keep.
    pub history_capacity: usize,
    /// Significant digits results are rounded to before display.
    pub significant_digits: usize,
    /// Show thousand separators in the entry and history.
    pub group_thousands: bool,
    /// Copy every result to the clipboard as soon as it is computed.
    pub copy_results: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            group_thousands: false,
            copy_results: false,
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
    }

    /// Load the config.
    ///
    /// An explicit `path` must exist. The default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                Some(path) => {
                    tracing::debug!("No config file at {:?}, using defaults", path);
                    Ok(Self::default())
                }
                None => {
                    tracing::warn!("Could not determine config directory, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.significant_digits = config.significant_digits.clamp(1, MAX_SIGNIFICANT_DIGITS);
        config.history_capacity = config.history_capacity.max(1);
        Ok(config)
    }

    /// A fresh calculator using these settings.
    pub fn calculator(&self) -> Calculator {
        Calculator::with_options(self.history_capacity, self.significant_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.significant_digits, 12);
        assert!(!config.group_thousands);
        assert!(!config.copy_results);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("group_thousands = true").unwrap();
        assert!(config.group_thousands);
        assert_eq!(config.history_capacity, 10);
    }

    #[test]
    fn test_values_are_clamped() {
        let config = Config::parse("history_capacity = 0\nsignificant_digits = 40").unwrap();
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.significant_digits, MAX_SIGNIFICANT_DIGITS);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(Config::parse("history_capacity = \"ten\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/zcalc.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_serializes_back() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_calculator_uses_capacity() {
        let config = Config::parse("history_capacity = 3").unwrap();
        assert_eq!(config.calculator().history().capacity(), 3);
    }
}
