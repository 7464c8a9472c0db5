//! TOML configuration plumbing for actuator module processes.
//!
//! Every process config carries a `[shared]` table (instance name, log
//! verbosity) next to its own sections, and is read through the blanket
//! [`ConfigLoader`] impl:
//!
//! ```rust,no_run
//! use dbw_common::actuator::config::ModuleConfig;
//! use dbw_common::config::{ConfigError, ConfigLoader};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = ModuleConfig::load(Path::new("config/throttle.toml"))?;
//!     config.validate()?;
//!     println!("{} runs {}", config.shared.service_name, config.module.kind);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Why a module config could not be used.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("config file not found")]
    FileNotFound,

    /// The file exists but could not be read.
    #[error("config file unreadable: {0}")]
    ReadError(String),

    /// Not valid TOML, or does not match the expected tables.
    #[error("config parse error: {0}")]
    ParseError(String),

    /// Parsed, but a value is out of bounds.
    #[error("config rejected: {0}")]
    ValidationError(String),
}

/// Log verbosity of a module process, `log_level = "..."` in `[shared]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    /// Per-read sensor classification and filter overrides.
    Debug,
    /// Mode changes and fault latches.
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string accepted by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` table.
///
/// ```toml
/// [shared]
/// service_name = "dbw-throttle"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Instance name, logged at start-up. One token, no whitespace.
    pub service_name: String,
}

impl SharedConfig {
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if `service_name` is empty or contains
    /// whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name is empty".to_string(),
            ));
        }
        if self.service_name.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "service_name {:?} contains whitespace",
                self.service_name
            )));
        }
        Ok(())
    }
}

/// TOML loading for any deserializable config type.
///
/// Loading only parses; callers run their own `validate` afterwards.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Read and parse `path`.
    ///
    /// # Errors
    ///
    /// `FileNotFound`, `ReadError` for other I/O failures, `ParseError`.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound,
            _ => ConfigError::ReadError(e.to_string()),
        })?;

        Self::from_toml(&content)
    }

    /// Parse TOML text.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
