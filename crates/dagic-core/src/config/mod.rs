//! Configuration management for dagic.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `dagic.toml` file
//! 3. User config `~/.config/dagic/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::similarity::MatrixOptions;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    RenderError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph loading configuration.
    pub graph: GraphConfig,

    /// Similarity table configuration.
    pub matrix: MatrixConfig,

    /// HTTP fetch configuration.
    pub fetch: FetchConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./dagic.toml` (project local)
    /// 2. `~/.config/dagic/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        // Graph overrides
        if let Ok(format) = std::env::var("DAGIC_GRAPH_FORMAT") {
            self.graph.format = format;
        }
        if let Ok(root) = std::env::var("DAGIC_ROOT") {
            self.graph.root = Some(root);
        }

        // Matrix overrides
        if let Ok(include_zero) = std::env::var("DAGIC_MATRIX_INCLUDE_ZERO") {
            self.matrix.include_zero = parse_env("DAGIC_MATRIX_INCLUDE_ZERO", &include_zero)?;
        }
        if let Ok(precision) = std::env::var("DAGIC_MATRIX_PRECISION") {
            self.matrix.precision = Some(parse_env("DAGIC_MATRIX_PRECISION", &precision)?);
        }

        // Fetch overrides
        if let Ok(timeout) = std::env::var("DAGIC_FETCH_TIMEOUT") {
            self.fetch.timeout_secs = parse_env("DAGIC_FETCH_TIMEOUT", &timeout)?;
        }
        if let Ok(retries) = std::env::var("DAGIC_FETCH_MAX_RETRIES") {
            self.fetch.max_retries = parse_env("DAGIC_FETCH_MAX_RETRIES", &retries)?;
        }
        if let Ok(delay) = std::env::var("DAGIC_FETCH_RETRY_DELAY_MS") {
            self.fetch.retry_delay_ms = parse_env("DAGIC_FETCH_RETRY_DELAY_MS", &delay)?;
        }

        // Log overrides
        if let Ok(level) = std::env::var("DAGIC_LOG_LEVEL") {
            self.log.level = level;
        }

        Ok(())
    }

    /// Render this configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        Config::default().to_toml_string().unwrap_or_default()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{name}={value}")))
}

/// Graph loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Format used when a file extension is not recognized: "json" or "graphml".
    pub format: String,

    /// Root term id, overriding automatic root detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_GRAPH_FORMAT.to_string(),
            root: None, // Detect from graph
        }
    }
}

/// Similarity table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Emit pairs whose MICA has zero information content.
    pub include_zero: bool,

    /// Decimal places for the similarity column.
    /// If not set, values are written at full precision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            include_zero: DEFAULT_INCLUDE_ZERO,
            precision: None,
        }
    }
}

impl MatrixConfig {
    /// Builds matrix options carrying this config's output settings.
    pub fn to_options(&self) -> MatrixOptions {
        MatrixOptions {
            include_zero: self.include_zero,
            precision: self.precision,
            ..MatrixOptions::default()
        }
    }
}

/// HTTP fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent header.
    pub user_agent: String,

    /// Retries after an HTTP 429 response.
    pub max_retries: u32,

    /// Delay before each retry, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
