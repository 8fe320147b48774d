//! Merge configuration (unify.toml)
//!
//! Values are layered: built-in defaults, then the config file, then CLI
//! flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::expand::DEFAULT_MAX_DEPTH;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "unify.toml";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// When a top-level file's output reaches the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    /// Write lines as they are produced; a failed file may leave partial output.
    #[default]
    Stream,
    /// Hold a file's output until it expanded completely.
    Buffered,
}

/// Configuration from unify.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnifyConfig {
    pub commit: CommitMode,

    /// Maximum include nesting, top-level file counted as 1.
    pub max_depth: usize,
}

impl Default for UnifyConfig {
    fn default() -> Self {
        Self {
            commit: CommitMode::Stream,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Values given on the command line; None/false leaves the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub buffered: bool,
    pub max_depth: Option<usize>,
}

impl UnifyConfig {
    /// Load and parse config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: UnifyConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the file layer.
    ///
    /// An explicit path must exist. Without one, `unify.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply the CLI layer on top of this one.
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        if overrides.buffered {
            self.commit = CommitMode::Buffered;
        }
        if let Some(depth) = overrides.max_depth {
            self.max_depth = depth;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ValidationError(
                "'max_depth' must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UnifyConfig::default();
        assert_eq!(config.commit, CommitMode::Stream);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(UnifyConfig::from_str("").unwrap(), UnifyConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let config = UnifyConfig::from_str(
            r#"
commit = "buffered"
max_depth = 16
"#,
        )
        .unwrap();
        assert_eq!(config.commit, CommitMode::Buffered);
        assert_eq!(config.max_depth, 16);
    }

    #[test]
    fn test_reject_zero_depth() {
        let result = UnifyConfig::from_str("max_depth = 0");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_reject_unknown_key() {
        let result = UnifyConfig::from_str("max_dept = 3");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_reject_unknown_commit_mode() {
        let result = UnifyConfig::from_str(r#"commit = "eventually""#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_overrides_win() {
        let config = UnifyConfig::from_str("max_depth = 8").unwrap();
        let config = config
            .with_overrides(&CliOverrides {
                buffered: true,
                max_depth: Some(3),
            })
            .unwrap();
        assert_eq!(config.commit, CommitMode::Buffered);
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn test_no_overrides_keep_file_values() {
        let config = UnifyConfig::from_str(r#"commit = "buffered""#).unwrap();
        let config = config.with_overrides(&CliOverrides::default()).unwrap();
        assert_eq!(config.commit, CommitMode::Buffered);
    }

    #[test]
    fn test_override_zero_depth_rejected() {
        let result = UnifyConfig::default().with_overrides(&CliOverrides {
            buffered: false,
            max_depth: Some(0),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = UnifyConfig::load(Some(Path::new("/nonexistent/unify.toml")));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
