//! Turning a loaded [`BridgeConfig`] into bridge and logging settings.
//!
//! The config crate keeps four-char codes as strings; they are parsed here.

use std::time::Duration;

use aebridge_config::BridgeConfig;
use aebridge_core::FourCharCode;
use aebridge_descriptor::Decoder;
use aebridge_events::BridgeOptions;
use aebridge_telemetry::LogConfig;

use crate::error::HostResult;

/// [`BridgeOptions`] from `[dispatch]` and `[decoder]`.
///
/// # Errors
///
/// Returns an error if an extra parameter is not a four-char code.
pub fn to_bridge_options(cfg: &BridgeConfig) -> HostResult<BridgeOptions> {
    let decoder = Decoder::new()
        .with_inline_text_limit(cfg.decoder.inline_text_limit)
        .with_max_depth(cfg.decoder.max_depth);
    let extra_parameters = cfg
        .decoder
        .extra_parameters
        .iter()
        .map(|code| code.parse::<FourCharCode>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BridgeOptions {
        decoder,
        extra_parameters,
        reply_timeout: reply_timeout(cfg),
    })
}

/// The `[[handlers]]` pairs as codes.
///
/// # Errors
///
/// Returns an error for the first entry that is not a four-char code.
pub fn to_handler_codes(cfg: &BridgeConfig) -> HostResult<Vec<(FourCharCode, FourCharCode)>> {
    cfg.handlers
        .iter()
        .map(|entry| -> HostResult<_> { Ok((entry.suite.parse()?, entry.event.parse()?)) })
        .collect()
}

/// [`LogConfig`] from `[logging]`.
///
/// # Errors
///
/// Returns an error for an unknown log format.
pub fn to_log_config(cfg: &BridgeConfig) -> HostResult<LogConfig> {
    Ok(LogConfig::from_section(&cfg.logging)?)
}

/// Queue capacity from `[dispatch]`.
#[must_use]
pub fn queue_capacity(cfg: &BridgeConfig) -> usize {
    cfg.dispatch.queue_capacity
}

/// Reply timeout from `[dispatch]`, `None` when disabled.
#[must_use]
pub fn reply_timeout(cfg: &BridgeConfig) -> Option<Duration> {
    cfg.dispatch.reply_timeout()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aebridge_config::HandlerEntry;

    #[test]
    fn test_defaults_convert() {
        let cfg = BridgeConfig::default();
        let options = to_bridge_options(&cfg).unwrap();
        assert_eq!(options.decoder.inline_text_limit(), 1024);
        assert_eq!(options.decoder.max_depth(), 64);
        assert!(options.extra_parameters.is_empty());
        assert_eq!(options.reply_timeout, None);
        assert_eq!(queue_capacity(&cfg), 256);
    }

    #[test]
    fn test_codes_are_parsed() {
        let mut cfg = BridgeConfig::default();
        cfg.decoder.extra_parameters = vec!["prdt".to_owned()];
        cfg.dispatch.reply_timeout_secs = 10;
        cfg.handlers = vec![HandlerEntry::new("GURL", "GURL")];

        let options = to_bridge_options(&cfg).unwrap();
        assert_eq!(options.extra_parameters, vec![FourCharCode::from_bytes(*b"prdt")]);
        assert_eq!(options.reply_timeout, Some(Duration::from_secs(10)));
        assert_eq!(
            to_handler_codes(&cfg).unwrap(),
            vec![(FourCharCode::from_bytes(*b"GURL"), FourCharCode::from_bytes(*b"GURL"))]
        );

        cfg.handlers.push(HandlerEntry::new("core", "toolong"));
        assert!(to_handler_codes(&cfg).is_err());
    }

    #[test]
    fn test_reply_timeout_feeds_bridge_options() {
        let mut cfg = BridgeConfig::default();
        assert_eq!(reply_timeout(&cfg), None);

        cfg.dispatch.reply_timeout_secs = 3;
        assert_eq!(reply_timeout(&cfg), Some(Duration::from_secs(3)));
        assert_eq!(to_bridge_options(&cfg).unwrap().reply_timeout, reply_timeout(&cfg));
    }

    #[test]
    fn test_log_config() {
        let mut cfg = BridgeConfig::default();
        cfg.logging.format = "json".to_owned();
        let log = to_log_config(&cfg).unwrap();
        assert_eq!(log.format, aebridge_telemetry::LogFormat::Json);
    }
}
