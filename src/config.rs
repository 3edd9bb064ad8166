//! Configuration file support for imagesense
//!
//! Supports TOML configuration files with the following search order:
//! 1. `--config <path>` - explicitly specified path
//! 2. `./imagesense.toml` - current directory
//! 3. `~/.config/imagesense/config.toml` - user config
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [general]
//! threads = 4
//! verbose = 1
//!
//! [colors]
//! count = 5
//! sample_step = 2
//! max_iterations = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::profile::AnalyzeOptions;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// File not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// General configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Number of threads for batch processing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    /// Verbosity level (0-2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<u8>,
}

/// Dominant color extraction configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ColorsConfig {
    /// Number of dominant colors to extract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Pixel sampling step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_step: Option<u32>,

    /// Clustering iteration cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,

    /// Clustering RNG seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Complete configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub colors: ColorsConfig,
}

impl Config {
    /// Load configuration from the standard search order
    ///
    /// Missing files are not an error; the default configuration is
    /// returned when no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd_config = PathBuf::from("./imagesense.toml");
        if cwd_config.exists() {
            return Self::load_from_path(&cwd_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let user_config = PathBuf::from(home)
                .join(".config")
                .join("imagesense")
                .join("config.toml");
            if user_config.exists() {
                return Self::load_from_path(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply configured values onto analyze options
    ///
    /// Only fields present in the file are applied; everything else keeps
    /// its current value.
    pub fn apply(&self, options: &mut AnalyzeOptions) {
        if let Some(count) = self.colors.count {
            options.color.color_count = count;
        }
        if let Some(step) = self.colors.sample_step {
            options.color.sample_step = step.max(1);
        }
        if let Some(iterations) = self.colors.max_iterations {
            options.color.max_iterations = iterations;
        }
        if let Some(seed) = self.colors.seed {
            options.color.seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.general.threads.is_none());
        assert!(config.colors.count.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [general]
            threads = 8
            verbose = 2

            [colors]
            count = 7
            sample_step = 3
            max_iterations = 50
            seed = 99
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.threads, Some(8));
        assert_eq!(config.general.verbose, Some(2));
        assert_eq!(config.colors.count, Some(7));
        assert_eq!(config.colors.sample_step, Some(3));
        assert_eq!(config.colors.max_iterations, Some(50));
        assert_eq!(config.colors.seed, Some(99));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("[colors]\ncount = 3\n").unwrap();
        assert_eq!(config.colors.count, Some(3));
        assert!(config.colors.sample_step.is_none());
        assert!(config.general.threads.is_none());
    }

    #[test]
    fn test_apply_overrides_only_present_fields() {
        let config: Config = toml::from_str("[colors]\ncount = 3\n").unwrap();

        let mut options = AnalyzeOptions::default();
        let original_step = options.color.sample_step;
        config.apply(&mut options);

        assert_eq!(options.color.color_count, 3);
        assert_eq!(options.color.sample_step, original_step);
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/imagesense.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imagesense.toml");
        std::fs::write(&path, "[general]\nthreads = 2\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.general.threads, Some(2));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let result = Config::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            general: GeneralConfig {
                threads: Some(4),
                verbose: Some(1),
            },
            colors: ColorsConfig {
                count: Some(5),
                sample_step: Some(2),
                max_iterations: None,
                seed: None,
            },
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
