//! Patcher configuration via `fieldpatch.toml`
//!
//! A small TOML file selects how atomic calls are carried out and how large
//! a document may grow. Every field has a default, so an empty file is a
//! valid configuration.

use fieldpatch_core::limits::{DEFAULT_MAX_BATCH_OPS, DEFAULT_MAX_NESTING_DEPTH};
use fieldpatch_core::{Error, Limits, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "fieldpatch.toml";

/// How an atomic call keeps concurrent writers out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicityMode {
    /// Patch while holding the location's lock inside the store
    Locked,
    /// Read, patch, compare-and-swap; retry on a version mismatch
    Optimistic {
        /// Attempts before giving up with a conflict
        max_retries: u32,
    },
}

/// Patcher configuration loaded from `fieldpatch.toml`
///
/// # Example
///
/// ```toml
/// atomicity = "optimistic"
/// max_retries = 32
/// max_document_size = 1048576
/// programs_dir = "/etc/fieldpatch/programs"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatcherConfig {
    /// Atomicity mode: `"locked"` or `"optimistic"`
    #[serde(default = "default_atomicity")]
    pub atomicity: String,
    /// Maximum compare-and-swap attempts in optimistic mode
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Largest document accepted or produced, in bytes
    #[serde(default = "default_max_document_size")]
    pub max_document_size: usize,
    /// Directory holding program definitions; built-ins are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programs_dir: Option<PathBuf>,
}

fn default_atomicity() -> String {
    "locked".to_string()
}

fn default_max_retries() -> u32 {
    16
}

fn default_max_document_size() -> usize {
    fieldpatch_core::limits::DEFAULT_MAX_DOCUMENT_BYTES
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            atomicity: default_atomicity(),
            max_retries: default_max_retries(),
            max_document_size: default_max_document_size(),
            programs_dir: None,
        }
    }
}

impl PatcherConfig {
    /// Configuration using optimistic compare-and-swap
    pub fn optimistic(max_retries: u32) -> Self {
        Self {
            atomicity: "optimistic".to_string(),
            max_retries,
            ..Self::default()
        }
    }

    /// Parse the atomicity string into an [`AtomicityMode`]
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"locked"` or `"optimistic"`,
    /// or if optimistic mode is asked to make zero attempts.
    pub fn atomicity_mode(&self) -> Result<AtomicityMode> {
        match self.atomicity.as_str() {
            "locked" => Ok(AtomicityMode::Locked),
            "optimistic" if self.max_retries == 0 => Err(Error::config(
                "max_retries must be at least 1 in optimistic mode",
            )),
            "optimistic" => Ok(AtomicityMode::Optimistic {
                max_retries: self.max_retries,
            }),
            other => Err(Error::config(format!(
                "invalid atomicity mode '{}'. Expected \"locked\" or \"optimistic\".",
                other
            ))),
        }
    }

    /// Engine limits derived from this configuration
    pub fn limits(&self) -> Limits {
        Limits {
            max_document_bytes: self.max_document_size,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_batch_ops: DEFAULT_MAX_BATCH_OPS,
        }
    }

    /// Check every field
    pub fn validate(&self) -> Result<()> {
        self.atomicity_mode()?;
        if self.max_document_size == 0 {
            return Err(Error::config("max_document_size must be positive"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# fieldpatch configuration
#
# Atomicity mode: "locked" (default) or "optimistic"
#   "locked"     = patch while holding the location's lock in the store
#   "optimistic" = read, patch, compare-and-swap, retry on conflict
atomicity = "locked"

# Maximum compare-and-swap attempts in optimistic mode
max_retries = 16

# Largest document accepted or produced, in bytes (default 16 MiB)
max_document_size = 16777216

# Directory holding program definitions (*.toml). Built-ins are used when unset.
# programs_dir = "/etc/fieldpatch/programs"
"#
    }

    /// Read and parse config from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: PatcherConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpatch_core::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_locked() {
        let config = PatcherConfig::default();
        assert_eq!(config.atomicity, "locked");
        assert_eq!(config.atomicity_mode().unwrap(), AtomicityMode::Locked);
        assert_eq!(config.limits(), Limits::default());
    }

    #[test]
    fn parse_optimistic() {
        let config: PatcherConfig =
            toml::from_str("atomicity = \"optimistic\"\nmax_retries = 3").unwrap();
        assert_eq!(
            config.atomicity_mode().unwrap(),
            AtomicityMode::Optimistic { max_retries: 3 }
        );
    }

    #[test]
    fn parse_invalid_mode_returns_error() {
        let config: PatcherConfig = toml::from_str("atomicity = \"turbo\"").unwrap();
        let err = config.atomicity_mode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("turbo"));
    }

    #[test]
    fn optimistic_with_zero_retries_is_rejected() {
        assert!(PatcherConfig::optimistic(0).atomicity_mode().is_err());
        assert!(PatcherConfig::optimistic(1).atomicity_mode().is_ok());
    }

    #[test]
    fn zero_document_size_is_rejected() {
        let config = PatcherConfig {
            max_document_size: 0,
            ..PatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_toml_parses_to_default() {
        let config: PatcherConfig = toml::from_str(PatcherConfig::default_toml()).unwrap();
        assert_eq!(config, PatcherConfig::default());
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        PatcherConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = PatcherConfig::from_file(&path).unwrap();
        assert_eq!(config.atomicity, "locked");
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "atomicity = \"optimistic\"\n").unwrap();
        PatcherConfig::write_default_if_missing(&path).unwrap();

        let config = PatcherConfig::from_file(&path).unwrap();
        assert_eq!(config.atomicity, "optimistic");
    }

    #[test]
    fn from_file_with_missing_field_uses_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let config = PatcherConfig::from_file(&path).unwrap();
        assert_eq!(config, PatcherConfig::default());
    }

    #[test]
    fn from_file_rejects_invalid_mode_eagerly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "atomicity = \"sometimes\"\n").unwrap();

        assert!(PatcherConfig::from_file(&path).is_err());
    }

    #[test]
    fn from_file_missing_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = PatcherConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = PatcherConfig {
            atomicity: "optimistic".to_string(),
            max_retries: 4,
            max_document_size: 4096,
            programs_dir: Some(PathBuf::from("/srv/programs")),
        };
        config.write_to_file(&path).unwrap();

        let loaded = PatcherConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.limits().max_document_bytes, 4096);
    }

    #[test]
    fn programs_dir_is_omitted_when_unset() {
        let toml_str = toml::to_string_pretty(&PatcherConfig::default()).unwrap();
        assert!(!toml_str.contains("programs_dir"));
    }
}
