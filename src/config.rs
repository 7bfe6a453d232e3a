//! Configuration loading and constants.
//!
//! The listen address and logging settings are resolved exactly once at
//! startup into an `AppConfig`, which is then handed to the server by value.
//! Sources are layered: built-in defaults, an optional TOML file, the `PORT`
//! environment variable, and finally command line overrides.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

// =============================================================================
// Service Identity
// =============================================================================

/// Name reported in the `service` field of the liveness payload
pub const SERVICE_NAME: &str = "tracker";

/// Value reported in the `status` field while the process is serving
pub const STATUS_OK: &str = "ok";

// =============================================================================
// Listener Defaults
// =============================================================================

/// Environment variable holding the listen port
pub const PORT_ENV_VAR: &str = "PORT";

/// Port used when neither the environment nor the config file names one
pub const DEFAULT_PORT: u16 = 8083;

/// Bind on all interfaces unless told otherwise
pub const DEFAULT_HOST: &str = "0.0.0.0";

// =============================================================================
// HTTP Response Headers
// =============================================================================

/// Liveness answers describe the process right now and must never be cached
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Response header carrying the per-request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "tracker=debug,tower_http=debug";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener configuration
    pub http: HttpServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Values given on the command line. Each one, when present, wins over every
/// other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_format: Option<LogFormat>,
}

impl AppConfig {
    /// Read a TOML config file. Missing sections and fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Build the startup configuration from every source.
    ///
    /// `port_env` is the raw value of the `PORT` variable, if set. An empty
    /// value counts as unset.
    pub fn resolve(
        config_path: Option<&Path>,
        port_env: Option<&str>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(port) = parse_port(port_env)? {
            config.http.port = port;
        }

        if let Some(host) = overrides.host {
            config.http.host = host;
        }
        if let Some(port) = overrides.port {
            config.http.port = port;
        }
        if let Some(format) = overrides.log_format {
            config.logging.format = format;
        }

        // Surface a bad host now rather than at bind time
        config.socket_addr()?;

        Ok(config)
    }

    /// The address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .http
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.http.host.clone()))?;
        Ok(SocketAddr::new(ip, self.http.port))
    }
}

/// Interpret a raw `PORT` value. Absent or blank means "not configured".
pub fn parse_port(raw: Option<&str>) -> Result<Option<u16>, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u16>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidPort(value.to_string())),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid port {0:?}: expected an integer between 0 and 65535")]
    InvalidPort(String),
    #[error("Invalid host {0:?}: expected an IP address")]
    InvalidHost(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_bind_port_8083() {
        let config = AppConfig::resolve(None, None, Overrides::default()).unwrap();
        assert_eq!(config.http.port, 8083);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8083");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_empty_port_env_falls_back_to_default() {
        let config = AppConfig::resolve(None, Some(""), Overrides::default()).unwrap();
        assert_eq!(config.http.port, DEFAULT_PORT);

        let config = AppConfig::resolve(None, Some("   "), Overrides::default()).unwrap();
        assert_eq!(config.http.port, DEFAULT_PORT);
    }

    #[test]
    fn test_port_env_is_used() {
        let config = AppConfig::resolve(None, Some("9000"), Overrides::default()).unwrap();
        assert_eq!(config.http.port, 9000);
    }

    #[test]
    fn test_invalid_port_env_is_rejected() {
        let err = AppConfig::resolve(None, Some("eighty"), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref v) if v == "eighty"));

        let err = parse_port(Some("70000")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_cli_port_wins_over_env() {
        let overrides = Overrides {
            port: Some(7000),
            ..Default::default()
        };
        let config = AppConfig::resolve(None, Some("9000"), overrides).unwrap();
        assert_eq!(config.http.port, 7000);
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let overrides = Overrides {
            host: Some("not an ip".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(None, None, overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost(_)));
    }

    #[test]
    fn test_ipv6_host() {
        let overrides = Overrides {
            host: Some("::1".to_string()),
            ..Default::default()
        };
        let config = AppConfig::resolve(None, None, overrides).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "[::1]:8083");
    }

    #[test]
    fn test_config_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[http]\nhost = \"127.0.0.1\"\nport = 8100\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = AppConfig::resolve(Some(file.path()), None, Overrides::default()).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8100);
        assert_eq!(config.logging.format, LogFormat::Json);

        let config =
            AppConfig::resolve(Some(file.path()), Some("8200"), Overrides::default()).unwrap();
        assert_eq!(config.http.port, 8200);
        assert_eq!(config.http.host, "127.0.0.1");
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"json\"").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http, HttpServerConfig::default());
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_config_file() {
        let err = AppConfig::load("/nonexistent/tracker.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = \"not a number\"").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
