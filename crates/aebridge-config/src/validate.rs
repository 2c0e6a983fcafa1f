//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::BridgeConfig;

/// Upper bound for `dispatch.queue_capacity`.
const MAX_QUEUE_CAPACITY: usize = 1_048_576;

/// Upper bound for `decoder.max_depth`.
const MAX_DECODE_DEPTH: usize = 4096;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate a merged configuration.
///
/// # Errors
///
/// Returns the first [`ConfigError::ValidationError`] found.
pub fn validate(config: &BridgeConfig) -> ConfigResult<()> {
    validate_dispatch(config)?;
    validate_decoder(config)?;
    validate_logging(config)?;
    validate_handlers(config)?;
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_dispatch(config: &BridgeConfig) -> ConfigResult<()> {
    let capacity = config.dispatch.queue_capacity;
    if capacity == 0 || capacity > MAX_QUEUE_CAPACITY {
        return Err(invalid(
            "dispatch.queue_capacity",
            format!("must be between 1 and {MAX_QUEUE_CAPACITY}, got {capacity}"),
        ));
    }
    Ok(())
}

fn validate_decoder(config: &BridgeConfig) -> ConfigResult<()> {
    let d = &config.decoder;
    if d.inline_text_limit == 0 {
        return Err(invalid("decoder.inline_text_limit", "must be at least 1"));
    }
    if d.max_depth == 0 || d.max_depth > MAX_DECODE_DEPTH {
        return Err(invalid(
            "decoder.max_depth",
            format!("must be between 1 and {MAX_DECODE_DEPTH}, got {}", d.max_depth),
        ));
    }
    for (i, code) in d.extra_parameters.iter().enumerate() {
        check_code(&format!("decoder.extra_parameters[{i}]"), code)?;
    }
    Ok(())
}

fn validate_logging(config: &BridgeConfig) -> ConfigResult<()> {
    let l = &config.logging;
    if !LOG_LEVELS.contains(&l.level.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unknown level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }
    if !LOG_FORMATS.contains(&l.format.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unknown format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }
    Ok(())
}

fn validate_handlers(config: &BridgeConfig) -> ConfigResult<()> {
    for (i, entry) in config.handlers.iter().enumerate() {
        check_code(&format!("handlers[{i}].suite"), &entry.suite)?;
        check_code(&format!("handlers[{i}].event"), &entry.event)?;
    }
    Ok(())
}

/// A four-char code is exactly four characters, each in Latin-1.
fn check_code(field: &str, code: &str) -> ConfigResult<()> {
    let count = code.chars().count();
    if count != 4 || code.chars().any(|c| u32::from(c) > 0xFF) {
        return Err(invalid(
            field,
            format!("'{code}' is not a four-char code (exactly four Latin-1 characters)"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HandlerEntry;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&BridgeConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = BridgeConfig::default();
        config.dispatch.queue_capacity = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("dispatch.queue_capacity"));
    }

    #[test]
    fn test_depth_bounds() {
        let mut config = BridgeConfig::default();
        config.decoder.max_depth = 0;
        assert!(validate(&config).is_err());
        config.decoder.max_depth = MAX_DECODE_DEPTH;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_codes_checked() {
        let mut config = BridgeConfig::default();
        config.handlers.push(HandlerEntry::new("core", "getd"));
        config.handlers.push(HandlerEntry::new("****", "URL "));
        assert!(validate(&config).is_ok());

        config.handlers.push(HandlerEntry::new("core", "get"));
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("handlers[2].event"));

        let mut config = BridgeConfig::default();
        config.decoder.extra_parameters.push("✓abc".to_owned());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_logging_values() {
        let mut config = BridgeConfig::default();
        config.logging.level = "DEBUG".to_owned();
        assert!(validate(&config).is_ok());

        config.logging.format = "xml".to_owned();
        assert!(validate(&config).is_err());
    }
}
