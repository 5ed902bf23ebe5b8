//! CLI configuration parsed from environment variables.
//!
//! Settings are read from the environment first and then overridden by
//! command-line flags.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable selecting the log level.
pub const LOG_LEVEL_ENV: &str = "TRELLIS_LOG_LEVEL";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The log level is not one of the supported names.
    #[error("unknown log level '{0}', expected one of: trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so diagnostics stay quiet unless asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging.
    Trace,
    /// Step matching and hook dispatch.
    Debug,
    /// Feature start and finish.
    Info,
    /// Suspicious input.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::UnknownLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration for the `cargo trellis` command.
///
/// # Environment Variables
///
/// - `TRELLIS_LOG_LEVEL`: trace, debug, info, warn or error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Minimum level of log records written to stderr.
    pub log_level: LogLevel,
}

impl CliConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_level = lookup(LOG_LEVEL_ENV)
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| Ok(LogLevel::default()), |value| value.parse())?;
        Ok(Self { log_level })
    }

    /// Apply command-line overrides on top of the environment.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}
