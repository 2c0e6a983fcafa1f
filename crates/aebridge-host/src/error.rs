//! Host error types.

use aebridge_config::ConfigError;
use aebridge_core::InvalidFourCharCode;
use aebridge_events::BridgeError;
use aebridge_telemetry::TelemetryError;
use thiserror::Error;

/// Why a handler could not produce a result. The message becomes the
/// reply's error string.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler refused the event.
    #[error("{0}")]
    Failed(String),

    /// No route matched the event.
    #[error("no handler for {suite}/{event}")]
    NoRoute {
        /// Suite of the event.
        suite: String,
        /// Event id of the event.
        event: String,
    },

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// A plain failure message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors raised while setting up a host.
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bridge refused a registration.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// A route or configured code is not a four-char code.
    #[error(transparent)]
    InvalidCode(#[from] InvalidFourCharCode),

    /// Logging could not be set up.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Result type for host setup.
pub type HostResult<T> = Result<T, HostError>;
