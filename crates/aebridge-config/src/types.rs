//! Configuration struct definitions.
//!
//! Field names match the TOML keys. Every section has defaults, so a file
//! only needs the keys it changes.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The complete bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Crossing from the OS event thread into the host.
    pub dispatch: DispatchSection,
    /// Descriptor decoding limits.
    pub decoder: DecoderSection,
    /// Log output.
    pub logging: LoggingSection,
    /// `(suite, event)` pairs installed at startup.
    pub handlers: Vec<HandlerEntry>,
}

/// `[dispatch]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSection {
    /// Capacity of the queue feeding the host.
    pub queue_capacity: usize,
    /// Seconds before an unanswered request is failed; `0` disables.
    pub reply_timeout_secs: u64,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            reply_timeout_secs: 0,
        }
    }
}

impl DispatchSection {
    /// The reply timeout, `None` when disabled.
    #[must_use]
    pub fn reply_timeout(&self) -> Option<Duration> {
        (self.reply_timeout_secs > 0).then(|| Duration::from_secs(self.reply_timeout_secs))
    }
}

/// `[decoder]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSection {
    /// Unknown-type payloads at or above this many bytes decode as the
    /// binary placeholder.
    pub inline_text_limit: usize,
    /// Maximum descriptor nesting depth.
    pub max_depth: usize,
    /// Extra four-char parameter codes to decode.
    pub extra_parameters: Vec<String>,
}

impl Default for DecoderSection {
    fn default() -> Self {
        Self {
            inline_text_limit: 1024,
            max_depth: 64,
            extra_parameters: Vec::new(),
        }
    }
}

/// `[logging]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output format (`pretty`, `compact`, `json`, `full`).
    pub format: String,
    /// Extra `EnvFilter` directives, e.g. `aebridge_events=trace`.
    pub directives: Vec<String>,
    /// Write daily-rotated files here instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            directory: None,
        }
    }
}

/// One `[[handlers]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerEntry {
    /// Suite (event class) code, e.g. `"core"`.
    pub suite: String,
    /// Event id code, e.g. `"getd"`.
    pub event: String,
}

impl HandlerEntry {
    /// A handler entry.
    #[must_use]
    pub fn new(suite: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            event: event.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_timeout_zero_is_off() {
        assert_eq!(DispatchSection::default().reply_timeout(), None);
        let section = DispatchSection {
            reply_timeout_secs: 30,
            ..DispatchSection::default()
        };
        assert_eq!(section.reply_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [dispatch]
            reply_timeout_secs = 5

            [[handlers]]
            suite = "core"
            event = "getd"
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch.queue_capacity, 256);
        assert_eq!(config.dispatch.reply_timeout_secs, 5);
        assert_eq!(config.decoder, DecoderSection::default());
        assert_eq!(config.handlers, vec![HandlerEntry::new("core", "getd")]);
    }
}
