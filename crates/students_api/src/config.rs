//! Service configuration.
//!
//! Loaded from an optional TOML file, then overridden by `STUDENTS_*`
//! environment variables. Every field has a default so the service starts
//! without any file.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "STUDENTS_";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config file `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid TOML config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment label, e.g. `dev` or `production`. Only logged.
    pub env: String,
    /// SQLite database file.
    pub storage_path: PathBuf,
    pub http_server: HttpServerConfig,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "dev".to_string(),
            storage_path: PathBuf::from("storage/storage.db"),
            http_server: HttpServerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    /// `host:port` to bind.
    pub address: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8082".to_string(),
        }
    }
}

impl HttpServerConfig {
    /// Parses `address` into a socket address.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        self.address.parse().map_err(|err| {
            ConfigError::Invalid(format!(
                "http_server.address `{}` is not a socket address: {err}",
                self.address
            ))
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files; stderr only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: students_core::default_log_level().to_string(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Loads config from `path` (or defaults), applies environment overrides
    /// and validates the result.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(ConfigError::Parse)
    }

    /// Applies `STUDENTS_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Keys: `STUDENTS_ENV`, `STUDENTS_STORAGE_PATH`, `STUDENTS_HTTP_ADDRESS`,
    /// `STUDENTS_LOG_LEVEL`, `STUDENTS_LOG_DIR`.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("ENV") {
            self.env = value;
        }
        if let Some(value) = var("STORAGE_PATH") {
            self.storage_path = PathBuf::from(value);
        }
        if let Some(value) = var("HTTP_ADDRESS") {
            self.http_server.address = value;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log.level = value;
        }
        if let Some(value) = var("LOG_DIR") {
            self.log.dir = Some(PathBuf::from(value));
        }
    }

    /// Checks values that cannot be expressed by the type alone.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage_path cannot be empty".to_string()));
        }
        self.http_server.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.env, "dev");
        assert_eq!(config.storage_path, PathBuf::from("storage/storage.db"));
        assert_eq!(config.http_server.address, "127.0.0.1:8082");
        assert!(config.log.dir.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_from_toml_fills_missing_fields_with_defaults() {
        let config = AppConfig::from_toml(
            r#"
            env = "production"
            storage_path = "/var/lib/students/students.db"

            [http_server]
            address = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.env, "production");
        assert_eq!(
            config.storage_path,
            PathBuf::from("/var/lib/students/students.db")
        );
        assert_eq!(config.http_server.address, "0.0.0.0:9000");
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = AppConfig::from_toml("env = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = [
            ("STUDENTS_ENV", "staging"),
            ("STUDENTS_HTTP_ADDRESS", "127.0.0.1:7000"),
            ("STUDENTS_LOG_LEVEL", "warn"),
            ("STUDENTS_LOG_DIR", "/tmp/students-logs"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides_from(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.env, "staging");
        assert_eq!(config.http_server.address, "127.0.0.1:7000");
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.dir, Some(PathBuf::from("/tmp/students-logs")));
        assert_eq!(config.storage_path, AppConfig::default().storage_path);
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut config = AppConfig::default();
        config.http_server.address = "not-an-address".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http_server.address"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.toml");
        std::fs::write(&path, "storage_path = \"data/test.db\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.storage_path, PathBuf::from("data/test.db"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
