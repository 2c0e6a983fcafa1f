//! Layered configuration for the aebridge host.
//!
//! ```rust,no_run
//! use aebridge_config::BridgeConfig;
//!
//! let resolved = BridgeConfig::load(None).unwrap();
//! println!("queue capacity: {}", resolved.config.dispatch.queue_capacity);
//! ```
//!
//! # Precedence
//!
//! From highest to lowest:
//!
//! 1. an explicit file passed to [`BridgeConfig::load`]
//! 2. the user file, `~/.aebridge/config.toml`
//! 3. `AEBRIDGE_*` environment variables, for fields no file set
//! 4. the embedded `defaults.toml`
//!
//! This crate does not depend on the other aebridge crates. Four-char codes
//! stay strings here and are parsed where the bridge is built.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

/// Environment variable fallbacks.
pub mod env;
/// Configuration error types.
pub mod error;
/// File discovery and layered loading.
pub mod loader;
/// Merging TOML layers.
pub mod merge;
/// Annotated display of a resolved configuration.
pub mod show;
/// Configuration structs.
pub mod types;
/// Validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl BridgeConfig {
    /// Load with the full precedence chain. See [`loader::load`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a file is malformed or the result fails
    /// validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, None)
    }

    /// Load with `home_dir` standing in for `~/.aebridge`.
    ///
    /// # Errors
    ///
    /// Same as [`BridgeConfig::load`].
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        home_dir: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, Some(home_dir))
    }
}
