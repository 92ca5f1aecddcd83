//! # Configuration Management
//!
//! Settings for the binrpc client and its logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults
//!
//! Timeouts are optional. They bound how long resolving, binding and writing
//! may take, but never change what goes on the wire.

use crate::error::{BinRpcError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Protocol magic nibble
pub const BINRPC_MAGIC: u8 = 0xA;

/// Protocol version nibble
pub const BINRPC_VERSION: u8 = 0x1;

/// Largest payload a 4-byte length field can declare
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize;

/// Largest payload the packet decoder accepts by default (one UDP datagram)
pub const DEFAULT_MAX_DECODE_PAYLOAD: usize = 64 * 1024;

/// Host used when none is configured
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port of Kamailio's ctl module binrpc listener
pub const DEFAULT_PORT: u16 = 2049;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BinRpcConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BinRpcConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BinRpcError::ConfigError(format!("Failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| BinRpcError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Defaults overridden by `BINRPC_*` environment variables.
    ///
    /// Unparseable numeric values are reported rather than ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("BINRPC_HOST") {
            config.client.host = host;
        }

        if let Ok(port) = std::env::var("BINRPC_PORT") {
            config.client.port = port
                .parse::<u16>()
                .map_err(|e| BinRpcError::ConfigError(format!("Invalid BINRPC_PORT: {e}")))?;
        }

        if let Ok(ms) = std::env::var("BINRPC_CONNECT_TIMEOUT_MS") {
            config.client.connect_timeout = Some(parse_millis("BINRPC_CONNECT_TIMEOUT_MS", &ms)?);
        }

        if let Ok(ms) = std::env::var("BINRPC_WRITE_TIMEOUT_MS") {
            config.client.write_timeout = Some(parse_millis("BINRPC_WRITE_TIMEOUT_MS", &ms)?);
        }

        if let Ok(level) = std::env::var("BINRPC_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| BinRpcError::ConfigError(format!("Invalid BINRPC_LOG_LEVEL: {level}")))?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Validate the configuration.
    ///
    /// Returns a list of problems. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.client.validate();
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BinRpcError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_millis(name: &str, value: &str) -> Result<Duration> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| BinRpcError::ConfigError(format!("Invalid {name}: {e}")))
}

/// Where and how to reach Kamailio's binrpc listener
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Host name or IP address of the Kamailio instance
    pub host: String,

    pub port: u16,

    /// Limit on resolving the host and binding the socket
    #[serde(default, with = "opt_duration_serde")]
    pub connect_timeout: Option<Duration>,

    /// Limit on the single datagram write
    #[serde(default, with = "opt_duration_serde")]
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            connect_timeout: None,
            write_timeout: None,
        }
    }
}

impl ClientConfig {
    /// `host:port` string, bracketing IPv6 literals
    pub fn target(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Validate client configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push("Client host cannot be empty".to_string());
        }

        if self.port == 0 {
            errors.push("Client port must be greater than 0".to_string());
        }

        for (name, timeout) in [
            ("Connect", self.connect_timeout),
            ("Write", self.write_timeout),
        ] {
            if let Some(t) = timeout {
                if t.as_millis() < 10 {
                    errors.push(format!("{name} timeout too short (minimum: 10ms)"));
                } else if t.as_secs() > 300 {
                    errors.push(format!("{name} timeout too long (maximum: 300s)"));
                }
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("kamailio-binrpc"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Optional durations as milliseconds
mod opt_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration
            .map(|d| d.as_millis() as u64)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
