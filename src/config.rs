//! # Application Configuration
//!
//! Process configuration loaded once at startup.
//!
//! [`AppConfig::load`] reads an optional `.env` file, then layers environment
//! variables over built-in defaults:
//!
//! | variable | default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `REQUEST_TIMEOUT_MS` | `30000` |
//! | `DYNAMODB_ENDPOINT` | unset |
//! | `AWS_REGION` | `us-east-1` |
//! | `DYNAMODB_TABLE` / `CHARGEBACK_TABLE_NAME` | `chargebacks` |
//! | `DYNAMODB_TIMEOUT_MS` | `5000` |
//! | `LOG_LEVEL` | `info` |
//! | `LOG_FORMAT` | `json` |
//! | `APP_VERSION` | `dev` |
//!
//! # Examples
//!
//! ```no_run
//! use chargeback_api::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! println!("listening on {}", config.server.bind_address());
//! # Ok::<(), chargeback_api::config::ConfigError>(())
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default bind host.
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port.
const DEFAULT_PORT: u16 = 8080;

/// Default HTTP request timeout in milliseconds.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default AWS region.
const DEFAULT_REGION: &str = "us-east-1";

/// Default chargeback table.
const DEFAULT_TABLE_NAME: &str = "chargebacks";

/// Default DynamoDB operation timeout in milliseconds.
const DEFAULT_DYNAMODB_TIMEOUT_MS: u64 = 5_000;

/// Default log level.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default reported service version.
const DEFAULT_VERSION: &str = "dev";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Whole-request deadline in milliseconds.
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    /// Returns the `host:port` socket address string.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request deadline.
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// DynamoDB connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbConfig {
    /// Chargeback table name.
    pub table_name: String,
    /// AWS region.
    pub region: String,
    /// Endpoint override, e.g. DynamoDB Local.
    pub endpoint: Option<String>,
    /// Per-operation timeout in milliseconds.
    pub timeout_ms: u64,
}

impl DynamoDbConfig {
    /// Returns the per-operation timeout.
    #[inline]
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns true if requests go to a local endpoint instead of AWS.
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable text.
    Text,
}

impl LogFormat {
    /// Parses a format name, falling back to JSON for unknown values.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("text") {
            Self::Text
        } else {
            Self::Json
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Service version reported by logs and the health endpoint.
    pub version: String,
}

/// Complete process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP server.
    pub server: ServerConfig,
    /// DynamoDB.
    pub dynamodb: DynamoDbConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Flat view of the environment as the `config` crate sees it.
#[derive(Debug, Deserialize)]
struct RawSettings {
    host: String,
    port: u16,
    request_timeout_ms: u64,
    dynamodb_endpoint: Option<String>,
    aws_region: String,
    dynamodb_table: Option<String>,
    chargeback_table_name: Option<String>,
    dynamodb_timeout_ms: u64,
    log_level: String,
    log_format: String,
    app_version: String,
}

impl AppConfig {
    /// Loads configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a variable cannot be converted to its
    /// field type.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_source(None)
    }

    /// Builds configuration from `vars`, or from the process environment
    /// when `None`.
    fn from_source(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let raw: RawSettings = ::config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?
            .set_default("aws_region", DEFAULT_REGION)?
            .set_default("dynamodb_timeout_ms", DEFAULT_DYNAMODB_TIMEOUT_MS)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("log_format", LogFormat::Json.to_string())?
            .set_default("app_version", DEFAULT_VERSION)?
            .add_source(::config::Environment::default().source(vars))
            .build()?
            .try_deserialize()?;

        Ok(raw.into())
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a zero port, an empty region or
    /// table name, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("PORT must be non-zero"));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid("REQUEST_TIMEOUT_MS must be non-zero"));
        }
        if self.dynamodb.region.trim().is_empty() {
            return Err(ConfigError::invalid("AWS_REGION must not be empty"));
        }
        if self.dynamodb.table_name.trim().is_empty() {
            return Err(ConfigError::invalid("DYNAMODB_TABLE must not be empty"));
        }
        if self.dynamodb.timeout_ms == 0 {
            return Err(ConfigError::invalid("DYNAMODB_TIMEOUT_MS must be non-zero"));
        }
        Ok(())
    }
}

impl From<RawSettings> for AppConfig {
    fn from(raw: RawSettings) -> Self {
        let table_name = raw
            .dynamodb_table
            .or(raw.chargeback_table_name)
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

        let level = raw.log_level.trim().to_ascii_lowercase();
        let level = if LOG_LEVELS.contains(&level.as_str()) {
            level
        } else {
            DEFAULT_LOG_LEVEL.to_string()
        };

        Self {
            server: ServerConfig {
                host: raw.host,
                port: raw.port,
                request_timeout_ms: raw.request_timeout_ms,
            },
            dynamodb: DynamoDbConfig {
                table_name,
                region: raw.aws_region,
                endpoint: raw.dynamodb_endpoint.filter(|e| !e.trim().is_empty()),
                timeout_ms: raw.dynamodb_timeout_ms,
            },
            logging: LoggingConfig {
                level,
                format: LogFormat::parse_lenient(&raw.log_format),
                version: raw.app_version,
            },
        }
    }
}
