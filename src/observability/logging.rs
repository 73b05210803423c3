//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Environment variable holding an `EnvFilter` directive.
pub const ENV_LOG: &str = "MAGIC_KEYWORDS_LOG";
/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "MAGIC_KEYWORDS_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "warn".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds the configuration from file settings and the environment.
    ///
    /// Precedence, highest first: `MAGIC_KEYWORDS_LOG`, `--verbose`, the
    /// configured level, then `warn`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_settings_with(settings, verbose, |name| std::env::var(name).ok())
    }

    /// Like [`LoggingConfig::from_settings`] with an explicit variable lookup.
    #[must_use]
    pub fn from_settings_with(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(settings) = settings {
            if let Some(level) = &settings.level {
                config.filter.clone_from(level);
            }
            if let Some(format) = &settings.format {
                config.format = LogFormat::parse(format);
            }
            config.file.clone_from(&settings.file);
        }

        if verbose {
            config.filter = "debug".to_string();
        }
        if let Some(directive) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.filter = directive;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).filter(|v| !v.trim().is_empty()) {
            config.format = LogFormat::parse(&format);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::from_settings_with(None, false, |_| None);
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_precedence() {
        let settings = LoggingSettings {
            level: Some("info".to_string()),
            format: Some("json".to_string()),
            file: Some(PathBuf::from("/tmp/kw.log")),
        };

        let config = LoggingConfig::from_settings_with(Some(&settings), false, |_| None);
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/kw.log")));

        let verbose = LoggingConfig::from_settings_with(Some(&settings), true, |_| None);
        assert_eq!(verbose.filter, "debug");

        let env = LoggingConfig::from_settings_with(Some(&settings), true, |name| {
            (name == ENV_LOG).then(|| "magic_keywords=trace".to_string())
        });
        assert_eq!(env.filter, "magic_keywords=trace");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("other"), LogFormat::Pretty);
    }
}
