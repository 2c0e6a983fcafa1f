//! Environment variable fallbacks.
//!
//! `AEBRIDGE_*` variables only fill fields no config file set. Embedded
//! defaults do not count as set.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};

enum Kind {
    Integer,
    String,
}

struct EnvMapping {
    var_name: &'static str,
    field_path: (&'static str, &'static str),
    kind: Kind,
}

const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "AEBRIDGE_LOG_LEVEL",
        field_path: ("logging", "level"),
        kind: Kind::String,
    },
    EnvMapping {
        var_name: "AEBRIDGE_LOG_FORMAT",
        field_path: ("logging", "format"),
        kind: Kind::String,
    },
    EnvMapping {
        var_name: "AEBRIDGE_QUEUE_CAPACITY",
        field_path: ("dispatch", "queue_capacity"),
        kind: Kind::Integer,
    },
    EnvMapping {
        var_name: "AEBRIDGE_REPLY_TIMEOUT_SECS",
        field_path: ("dispatch", "reply_timeout_secs"),
        kind: Kind::Integer,
    },
];

/// Apply `AEBRIDGE_*` fallbacks to fields not set by a file.
///
/// Returns the number of variables applied.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] when a numeric variable does not parse.
pub fn apply_env_fallbacks<S: BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let (section, key) = mapping.field_path;
        let path = format!("{section}.{key}");
        if sources
            .get(&path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            continue;
        }
        let Some(raw) = env_vars.get(mapping.var_name) else {
            continue;
        };

        let value = match mapping.kind {
            Kind::String => toml::Value::String(raw.clone()),
            Kind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(toml::Value::Integer)
                .map_err(|e| ConfigError::EnvError {
                    var_name: mapping.var_name.to_owned(),
                    message: format!("expected an integer, got '{raw}': {e}"),
                })?,
        };

        debug!(var = mapping.var_name, field = %path, "applying env var fallback");
        set_field(merged, section, key, value);
        sources.insert(path, ConfigLayer::Environment);
        count = count.saturating_add(1);
    }

    Ok(count)
}

fn set_field(root: &mut toml::Value, section: &str, key: &str, value: toml::Value) {
    let Some(table) = root.as_table_mut() else {
        return;
    };
    let entry = table
        .entry(section.to_owned())
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    if let Some(section) = entry.as_table_mut() {
        section.insert(key.to_owned(), value);
    }
}

/// Snapshot of the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_fallback_fills_unset_and_default_fields() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"info\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::Defaults);
        let env = make_env(&[
            ("AEBRIDGE_LOG_LEVEL", "debug"),
            ("AEBRIDGE_QUEUE_CAPACITY", "32"),
        ]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env).unwrap();

        assert_eq!(count, 2);
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(merged["dispatch"]["queue_capacity"].as_integer(), Some(32));
        assert_eq!(
            sources.get("dispatch.queue_capacity"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_fallback_skips_file_values() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);
        let env = make_env(&[("AEBRIDGE_LOG_LEVEL", "debug")]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env).unwrap();

        assert_eq!(count, 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_bad_integer_is_an_error() {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        let mut sources = FieldSources::new();
        let env = make_env(&[("AEBRIDGE_REPLY_TIMEOUT_SECS", "soon")]);

        let err = apply_env_fallbacks(&mut merged, &mut sources, &env).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvError { ref var_name, .. } if var_name == "AEBRIDGE_REPLY_TIMEOUT_SECS"
        ));
    }
}
