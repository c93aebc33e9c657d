//! Logging setup for the CLI
//!
//! Events go to stderr so that stdout carries only the resolution output.
//! Filter precedence: `CLUSTER_PROFILES_LOG` env var, then `--verbose`,
//! then the default level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "CLUSTER_PROFILES_LOG";

/// Environment variable selecting the output format (`text` or `json`)
pub const LOG_FORMAT_ENV: &str = "CLUSTER_PROFILES_LOG_FORMAT";

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "debug";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Result<Self, LoggingError> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log format: {0} (must be 'json' or 'text')")]
    InvalidFormat(String),

    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber.
pub fn init_logging(verbose: bool) -> Result<(), LoggingError> {
    let filter = build_env_filter(verbose);
    let format = match std::env::var(LOG_FORMAT_ENV) {
        Ok(value) => LogFormat::parse(&value)?,
        Err(_) => LogFormat::default(),
    };

    let registry = Registry::default().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    EnvFilter::new(default_level(verbose))
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LEVEL
    } else {
        DEFAULT_LEVEL
    }
}
