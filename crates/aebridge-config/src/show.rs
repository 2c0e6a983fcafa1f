//! Rendering a resolved configuration with the layer behind each value.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use crate::merge::FieldSources;
use crate::types::BridgeConfig;

/// A loaded configuration and where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged, validated configuration.
    pub config: BridgeConfig,
    /// Dotted field path to the layer that set it.
    pub field_sources: FieldSources,
    /// Files that were read, lowest precedence first.
    pub loaded_files: Vec<PathBuf>,
}

/// Output format for [`ResolvedConfig::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with a trailing `# [layer]` comment per value.
    Toml,
    /// Plain JSON.
    Json,
}

impl ResolvedConfig {
    /// Render the configuration, or one top-level `section` of it.
    ///
    /// # Errors
    ///
    /// Returns [`fmt::Error`] if `section` does not exist or serialization
    /// fails.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> Result<String, fmt::Error> {
        let value = self.section_value(section)?;
        match format {
            ShowFormat::Json => serde_json::to_string_pretty(&value).map_err(|_| fmt::Error),
            ShowFormat::Toml => self.annotated_toml(&value, section),
        }
    }

    fn section_value(&self, section: Option<&str>) -> Result<toml::Value, fmt::Error> {
        let root = toml::Value::try_from(&self.config).map_err(|_| fmt::Error)?;
        match section {
            None => Ok(root),
            Some(name) => root.get(name).cloned().ok_or(fmt::Error),
        }
    }

    fn annotated_toml(&self, value: &toml::Value, section: Option<&str>) -> Result<String, fmt::Error> {
        let body = toml::to_string_pretty(value).map_err(|_| fmt::Error)?;

        let mut out = String::from("# Resolved aebridge configuration\n");
        for (i, path) in self.loaded_files.iter().enumerate() {
            writeln!(out, "#   {}. {}", i.saturating_add(1), path.display())?;
        }
        out.push('\n');

        let mut table = section.unwrap_or_default().to_owned();
        for line in body.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[') {
                let name = header.trim_start_matches('[').trim_end_matches(']');
                table = match section {
                    Some(outer) => format!("{outer}.{name}"),
                    None => name.to_owned(),
                };
                writeln!(out, "{line}")?;
                continue;
            }
            match self.source_of(&table, trimmed) {
                Some(layer) => writeln!(out, "{line}  # [{layer}]")?,
                None => writeln!(out, "{line}")?,
            }
        }
        Ok(out)
    }

    fn source_of(&self, table: &str, line: &str) -> Option<String> {
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let key = line.split('=').next()?.trim();
        let path = if table.is_empty() {
            key.to_owned()
        } else {
            format!("{table}.{key}")
        };
        self.field_sources.get(&path).map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ConfigLayer;

    fn resolved() -> ResolvedConfig {
        let mut field_sources = FieldSources::new();
        field_sources.insert("dispatch.queue_capacity".to_owned(), ConfigLayer::File);
        field_sources.insert("logging.level".to_owned(), ConfigLayer::Environment);
        ResolvedConfig {
            config: BridgeConfig::default(),
            field_sources,
            loaded_files: vec![PathBuf::from("/tmp/bridge.toml")],
        }
    }

    #[test]
    fn test_toml_is_annotated() {
        let out = resolved().show(ShowFormat::Toml, None).unwrap();
        assert!(out.contains("1. /tmp/bridge.toml"));
        assert!(out.contains("queue_capacity = 256  # [file]"));
        assert!(out.contains("level = \"info\"  # [env]"));
    }

    #[test]
    fn test_single_section() {
        let out = resolved().show(ShowFormat::Toml, Some("dispatch")).unwrap();
        assert!(out.contains("queue_capacity = 256  # [file]"));
        assert!(!out.contains("level"));
    }

    #[test]
    fn test_json_section() {
        let out = resolved().show(ShowFormat::Json, Some("decoder")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["max_depth"], 64);
    }

    #[test]
    fn test_unknown_section_errors() {
        assert!(resolved().show(ShowFormat::Json, Some("nope")).is_err());
    }
}
