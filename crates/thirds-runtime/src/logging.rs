#![forbid(unsafe_code)]

//! Global `tracing` subscriber setup.
//!
//! Library code only emits events (`thirds.engine`, `thirds.persist`);
//! applications call [`init`] once at startup to print them.

use std::fmt;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::settings::LoggingSettings;

/// Errors from installing the subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// The filter directives do not parse.
    InvalidFilter { filter: String, reason: String },
    /// JSON output was requested but the `json-logs` feature is off.
    JsonUnavailable,
    /// A global subscriber is already installed.
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter { filter, reason } => {
                write!(f, "invalid log filter {filter:?}: {reason}")
            }
            Self::JsonUnavailable => f.write_str("JSON logging requires the `json-logs` feature"),
            Self::AlreadyInitialized(reason) => {
                write!(f, "logging already initialized: {reason}")
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// `RUST_LOG` when set and valid, otherwise `settings.filter`.
pub fn filter_for(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.filter).map_err(|e| LoggingError::InvalidFilter {
        filter: settings.filter.clone(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber described by `settings`.
pub fn init(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let filter = filter_for(settings)?;

    #[cfg(feature = "json-logs")]
    let json_layer = settings.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
    });
    #[cfg(not(feature = "json-logs"))]
    let json_layer: Option<tracing_subscriber::layer::Identity> = {
        if settings.json {
            return Err(LoggingError::JsonUnavailable);
        }
        None
    };

    let text_layer = (!settings.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(settings.ansi)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(
        target: "thirds.runtime",
        json = settings.json,
        "logging initialized"
    );
    Ok(())
}
