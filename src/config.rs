use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Checker settings, usually read from a JSON file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Nesting budget for instruction, type and literal recursion.
    pub max_depth: usize,
    /// Treat a program whose code always fails as a check failure.
    pub reject_failed_programs: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1024,
            reject_failed_programs: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("max_depth must be positive")]
    ZeroDepth,
}

impl CheckerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: CheckerConfig =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        if config.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = CheckerConfig::default();
        assert_eq!(c.max_depth, 1024);
        assert!(!c.reject_failed_programs);
        assert_eq!(CheckerConfig::from_json("{}").unwrap(), c);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.json");
        std::fs::write(&path, r#"{"max_depth": 64, "reject_failed_programs": true}"#).unwrap();
        let c = CheckerConfig::load(&path).unwrap();
        assert_eq!(c.max_depth, 64);
        assert!(c.reject_failed_programs);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let c = CheckerConfig::from_json(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(c.max_depth, 8);
        assert!(!c.reject_failed_programs);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            CheckerConfig::from_json(r#"{"max_dept": 8}"#),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            CheckerConfig::from_json(r#"{"max_depth": 0}"#),
            Err(ConfigError::ZeroDepth)
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckerConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().starts_with("cannot read"));
    }
}
