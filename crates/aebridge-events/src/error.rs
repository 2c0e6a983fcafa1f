//! Error types for the event bridge.

use aebridge_core::{FourCharCode, InvalidFourCharCode};
use thiserror::Error;

use crate::status::OsStatus;

/// Errors surfaced by [`EventBridge`](crate::EventBridge) registration.
///
/// Per-event failures never show up here; they are answered to the sender
/// and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The OS rejected a handler registration.
    #[error("failed to install handler for {suite}/{event}: {status}")]
    InstallFailed {
        /// Suite code.
        suite: FourCharCode,
        /// Event code.
        event: FourCharCode,
        /// Status returned by the OS.
        status: OsStatus,
    },

    /// A suite or event code was not four Latin-1 characters.
    #[error(transparent)]
    InvalidCode(#[from] InvalidFourCharCode),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
