//! Configuration management.
//!
//! Settings come from an optional TOML file, then environment overrides.
//!
//! ```toml
//! data_dir = "/var/lib/magic-keywords"
//! storage_key = "magic_keywords_data"
//! validation = "strict"
//!
//! [import]
//! merge = true
//! overwrite = false
//!
//! [logging]
//! level = "info"
//! format = "json"
//! file = "/var/log/magic-keywords.log"
//! ```

use crate::io::{ImportOptions, ValidationMode};
use crate::storage::DEFAULT_STORAGE_KEY;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "MAGIC_KEYWORDS_DATA_DIR";
/// Environment variable overriding the storage key.
pub const ENV_STORAGE_KEY: &str = "MAGIC_KEYWORDS_STORAGE_KEY";
/// Environment variable overriding the validation mode.
pub const ENV_VALIDATION: &str = "MAGIC_KEYWORDS_VALIDATION";
/// Environment variable pointing at an explicit config file.
pub const ENV_CONFIG_PATH: &str = "MAGIC_KEYWORDS_CONFIG_PATH";

const APP_DIR: &str = "magic-keywords";

/// Main configuration for the keyword catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordsConfig {
    /// Directory holding the persisted collection.
    pub data_dir: PathBuf,
    /// Key the collection is stored under.
    pub storage_key: String,
    /// Default validation mode for imports.
    pub validation: ValidationMode,
    /// Default import behavior.
    pub import: ImportDefaults,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Default import behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportDefaults {
    /// Keep the existing collection when importing.
    pub merge: bool,
    /// Replace existing records on term conflicts.
    pub overwrite: bool,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            merge: true,
            overwrite: false,
        }
    }
}

/// Logging settings as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `magic_keywords=debug`.
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Storage key.
    pub storage_key: Option<String>,
    /// Validation mode.
    pub validation: Option<String>,
    /// Import defaults.
    pub import: Option<ConfigFileImport>,
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
}

/// Import section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileImport {
    /// Merge mode.
    pub merge: Option<bool>,
    /// Overwrite mode.
    pub overwrite: Option<bool>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            validation: ValidationMode::default(),
            import: ImportDefaults::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Returns the platform data directory, or `.magic-keywords` if unknown.
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".magic-keywords"),
        |dirs| dirs.data_dir().join(APP_DIR),
    )
}

impl KeywordsConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::operation("read_config_file", e))?;

        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| crate::Error::operation("parse_config_file", e))?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/magic-keywords/` on macOS)
    /// 2. XDG config dir (`~/.config/magic-keywords/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join(APP_DIR).join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join(APP_DIR)
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                },
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `KeywordsConfig`.
    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(key) = file.storage_key {
            config.storage_key = key;
        }
        if let Some(mode) = file.validation {
            config.validation = mode.parse()?;
        }
        if let Some(import) = file.import {
            if let Some(v) = import.merge {
                config.import.merge = v;
            }
            if let Some(v) = import.overwrite {
                config.import.overwrite = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Applies `MAGIC_KEYWORDS_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from a variable lookup.
    ///
    /// Empty values are ignored, as are unparseable validation modes.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = var(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = var(ENV_STORAGE_KEY) {
            self.storage_key = key;
        }
        if let Some(mode) = var(ENV_VALIDATION) {
            match mode.parse::<ValidationMode>() {
                Ok(mode) => self.validation = mode,
                Err(e) => {
                    tracing::warn!(var = ENV_VALIDATION, error = %e, "Ignoring invalid override");
                },
            }
        }
        self
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Returns the import options these settings imply.
    #[must_use]
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions::default()
            .with_merge(self.import.merge)
            .with_overwrite(self.import.overwrite)
            .with_validation(self.validation)
    }
}
