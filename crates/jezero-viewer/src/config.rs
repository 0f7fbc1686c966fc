//! Configuration loading for the viewer.
//!
//! The configuration lives in `jezero.yaml` (or the file named by
//! `JEZERO_CONFIG`). Every section and field has a default, so a missing
//! file or an empty document yields a working setup that talks to a
//! geometry service on `localhost:8000`.

use std::path::Path;

use jezero_acquire::{GatewayConfig, GatewaySource};
use jezero_observer::ServerConfig;
use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "JEZERO_CONFIG";

/// Config file used when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "jezero.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value (usually from the environment) is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Top-level viewer configuration, mirroring `jezero.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewerConfig {
    /// Where geometry documents come from.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Observer server bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Issue a load intent as soon as the store is up.
    #[serde(default = "default_load_on_startup")]
    pub load_on_startup: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            load_on_startup: default_load_on_startup(),
        }
    }
}

const fn default_load_on_startup() -> bool {
    true
}

impl ViewerConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed, or an override is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a YAML file, without overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, without overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production):
    ///
    /// - `JEZERO_ORIGIN` overrides `gateway.origin`
    /// - `JEZERO_DATA_DIR` overrides `gateway.directory` and selects the
    ///   directory source
    /// - `JEZERO_PORT` overrides `server.port`
    /// - `JEZERO_LOG_FORMAT` overrides `logging.format` (`pretty` or `json`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unparseable port or format.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(origin) = lookup("JEZERO_ORIGIN") {
            self.gateway.origin = origin;
        }
        if let Some(dir) = lookup("JEZERO_DATA_DIR") {
            self.gateway.directory = dir.into();
            self.gateway.source = GatewaySource::Directory;
        }
        if let Some(port) = lookup("JEZERO_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("JEZERO_PORT={port}: {e}")))?;
        }
        if let Some(format) = lookup("JEZERO_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "JEZERO_LOG_FORMAT={other}: expected pretty or json"
                    )));
                }
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = ViewerConfig::parse("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert!(config.load_on_startup);
        assert_eq!(config.gateway.timeout_ms, 30_000);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r"
gateway:
  origin: https://mars.example.org
  timeout_ms: 5000
server:
  port: 9090
logging:
  format: json
load_on_startup: false
";
        let config = ViewerConfig::parse(yaml).unwrap();
        assert_eq!(config.gateway.origin, "https://mars.example.org");
        assert_eq!(config.gateway.path_prefix, "mars-20/api");
        assert_eq!(config.gateway.timeout_ms, 5_000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert!(!config.load_on_startup);
    }

    #[test]
    fn unknown_source_is_yaml_error() {
        let err = ViewerConfig::parse("gateway:\n  source: carrier-pigeon\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn overrides_replace_values() {
        let mut config = ViewerConfig::default();
        config
            .apply_overrides(env(&[
                ("JEZERO_ORIGIN", "http://10.0.0.5:8000"),
                ("JEZERO_DATA_DIR", "/srv/mars/data"),
                ("JEZERO_PORT", "3000"),
                ("JEZERO_LOG_FORMAT", "JSON"),
            ]))
            .unwrap();

        assert_eq!(config.gateway.origin, "http://10.0.0.5:8000");
        assert_eq!(config.gateway.directory, PathBuf::from("/srv/mars/data"));
        assert_eq!(config.gateway.source, GatewaySource::Directory);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let mut config = ViewerConfig::default();
        let err = config
            .apply_overrides(env(&[("JEZERO_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = config
            .apply_overrides(env(&[("JEZERO_LOG_FORMAT", "xml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn loads_from_file_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jezero.yaml");
        std::fs::write(&path, "gateway:\n  source: directory\n  directory: fixtures\n").unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.gateway.source, GatewaySource::Directory);
        assert_eq!(config.gateway.directory, PathBuf::from("fixtures"));

        let missing = ViewerConfig::from_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
