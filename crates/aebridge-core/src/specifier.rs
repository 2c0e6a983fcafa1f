//! Object specifiers and their readable summaries.
//!
//! An object specifier locates a live object in the target application,
//! relative to a container that is usually another specifier:
//!
//! ```text
//! prop 'URL ' of (cTab 1 of (cwin 1 of null))
//! ```
//!
//! The summary is a pure function of the other fields. It is cached in
//! `human_readable` by [`ObjectSpecifier::summarize`] and dropped by every
//! setter, so a cached summary is always the one [`ObjectSpecifier::describe`]
//! would compute.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::fourcc::FourCharCode;
use crate::value::Value;

/// Tag written into the serialized form of every specifier.
pub const OBJECT_SPECIFIER_TYPE: &str = "objectSpecifier";

/// A decoded object specifier.
///
/// Every field is optional: a sub-field the decoder could not read is left
/// absent rather than defaulted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSpecifier {
    object_class: Option<String>,
    key_form: Option<String>,
    key_data: Option<Value>,
    key_data_hex: Option<String>,
    container: Option<Value>,
    human_readable: Option<String>,
}

impl ObjectSpecifier {
    /// Create an empty specifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the desired class (e.g. `"prop"`, `"cwin"`).
    #[must_use]
    pub fn with_object_class(mut self, class: impl Into<String>) -> Self {
        self.object_class = Some(class.into());
        self.human_readable = None;
        self
    }

    /// Set the key form (e.g. `"prop"`, `"indx"`, `"name"`).
    #[must_use]
    pub fn with_key_form(mut self, form: impl Into<String>) -> Self {
        self.key_form = Some(form.into());
        self.human_readable = None;
        self
    }

    /// Set the key data to an arbitrary decoded value.
    #[must_use]
    pub fn with_key_data(mut self, data: impl Into<Value>) -> Self {
        self.key_data = Some(data.into());
        self.key_data_hex = None;
        self.human_readable = None;
        self
    }

    /// Set the key data to a four-char code, keeping its hex form alongside.
    #[must_use]
    pub fn with_key_code(mut self, code: FourCharCode) -> Self {
        self.key_data = Some(Value::String(code.to_string()));
        self.key_data_hex = Some(code.to_hex());
        self.human_readable = None;
        self
    }

    /// Set the container this specifier is relative to.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<Value>) -> Self {
        self.container = Some(container.into());
        self.human_readable = None;
        self
    }

    /// The desired class, if it was read.
    #[must_use]
    pub fn object_class(&self) -> Option<&str> {
        self.object_class.as_deref()
    }

    /// The key form, if it was read.
    #[must_use]
    pub fn key_form(&self) -> Option<&str> {
        self.key_form.as_deref()
    }

    /// The key data, if it was read.
    #[must_use]
    pub fn key_data(&self) -> Option<&Value> {
        self.key_data.as_ref()
    }

    /// Hex form of the key data when it was a four-char code.
    #[must_use]
    pub fn key_data_hex(&self) -> Option<&str> {
        self.key_data_hex.as_deref()
    }

    /// The container, if it was read.
    #[must_use]
    pub fn container(&self) -> Option<&Value> {
        self.container.as_ref()
    }

    /// The cached summary, if [`summarize`](Self::summarize) has run.
    #[must_use]
    pub fn human_readable(&self) -> Option<&str> {
        self.human_readable.as_deref()
    }

    /// Readable phrase for this specifier.
    ///
    /// Returns the cached summary when present, otherwise computes
    /// `"<class> <keyData>"` followed by `" of <container>"` when the
    /// container is itself a specifier, trimmed at both ends.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.human_readable {
            Some(summary) => summary.clone(),
            None => self.compute_summary(),
        }
    }

    /// Cache the summary here and in every nested specifier.
    pub fn summarize(&mut self) {
        if let Some(container) = &mut self.container {
            container.summarize();
        }
        if let Some(data) = &mut self.key_data {
            data.summarize();
        }
        self.human_readable = Some(self.compute_summary());
    }

    fn compute_summary(&self) -> String {
        let class = self.object_class.as_deref().unwrap_or_default();
        let key = self
            .key_data
            .as_ref()
            .map(Value::describe)
            .unwrap_or_default();

        let mut phrase = format!("{class} {key}");
        if let Some(Value::Specifier(container)) = &self.container {
            phrase.push_str(" of ");
            phrase.push_str(&container.describe());
        }
        phrase.trim().to_owned()
    }
}

impl Serialize for ObjectSpecifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", OBJECT_SPECIFIER_TYPE)?;
        if let Some(class) = &self.object_class {
            map.serialize_entry("objectClass", class)?;
        }
        if let Some(form) = &self.key_form {
            map.serialize_entry("keyForm", form)?;
        }
        if let Some(data) = &self.key_data {
            map.serialize_entry("keyData", data)?;
        }
        if let Some(hex) = &self.key_data_hex {
            map.serialize_entry("keyDataHex", hex)?;
        }
        if let Some(container) = &self.container {
            map.serialize_entry("container", container)?;
        }
        if let Some(summary) = &self.human_readable {
            map.serialize_entry("humanReadable", summary)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> FourCharCode {
        FourCharCode::parse(s).unwrap()
    }

    fn url_of_first_tab() -> ObjectSpecifier {
        let tab = ObjectSpecifier::new()
            .with_object_class("cTab")
            .with_key_form("indx")
            .with_key_data(1)
            .with_container(Value::Null);

        ObjectSpecifier::new()
            .with_object_class("prop")
            .with_key_code(code("URL "))
            .with_container(tab)
    }

    #[test]
    fn test_describe_keeps_inner_spacing() {
        let spec = url_of_first_tab();
        assert_eq!(spec.describe(), "prop URL  of cTab 1");
    }

    #[test]
    fn test_describe_is_idempotent() {
        let mut spec = url_of_first_tab();
        let first = spec.describe();
        assert_eq!(spec.describe(), first);

        spec.summarize();
        assert_eq!(spec.human_readable(), Some(first.as_str()));
        assert_eq!(spec.describe(), first);

        spec.summarize();
        assert_eq!(spec.describe(), first);
    }

    #[test]
    fn test_summarize_reaches_containers() {
        let mut spec = url_of_first_tab();
        spec.summarize();
        let container = spec.container().unwrap().as_specifier().unwrap();
        assert_eq!(container.human_readable(), Some("cTab 1"));
    }

    #[test]
    fn test_setter_drops_stale_summary() {
        let mut spec = url_of_first_tab();
        spec.summarize();
        let spec = spec.with_object_class("pnam");
        assert_eq!(spec.human_readable(), None);
        assert_eq!(spec.describe(), "pnam URL  of cTab 1");
    }

    #[test]
    fn test_missing_fields_trim() {
        assert_eq!(ObjectSpecifier::new().describe(), "");
        assert_eq!(ObjectSpecifier::new().with_object_class("cwin").describe(), "cwin");
        assert_eq!(ObjectSpecifier::new().with_key_data("x").describe(), "x");
    }

    #[test]
    fn test_non_specifier_container_ends_chain() {
        let spec = ObjectSpecifier::new()
            .with_object_class("cwin")
            .with_key_data(1)
            .with_container("application");
        assert_eq!(spec.describe(), "cwin 1");
    }

    #[test]
    fn test_key_code_keeps_hex() {
        let spec = ObjectSpecifier::new().with_key_code(code("URL "));
        assert_eq!(spec.key_data().and_then(Value::as_str), Some("URL "));
        assert_eq!(spec.key_data_hex(), Some("0x55524c20"));

        let spec = spec.with_key_data(3);
        assert_eq!(spec.key_data_hex(), None);
    }

    #[test]
    fn test_serialize_absent_vs_null() {
        let mut spec = url_of_first_tab();
        spec.summarize();
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["type"], "objectSpecifier");
        assert_eq!(json["objectClass"], "prop");
        assert!(json.get("keyForm").is_none());
        assert_eq!(json["keyData"], "URL ");
        assert_eq!(json["keyDataHex"], "0x55524c20");
        assert_eq!(json["humanReadable"], "prop URL  of cTab 1");

        let container = &json["container"];
        assert_eq!(container["keyForm"], "indx");
        assert!(container.get("container").unwrap().is_null());
    }
}
