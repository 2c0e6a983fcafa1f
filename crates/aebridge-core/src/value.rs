//! The decoded value tree.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::specifier::ObjectSpecifier;

/// A decoded Apple Event value.
///
/// Integers and floats both normalize to [`Value::Number`]. A descriptor
/// that could not be read decodes to [`Value::Null`], never to a partially
/// filled variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicit null, or a descriptor whose data could not be retrieved.
    #[default]
    Null,
    /// Text.
    String(String),
    /// Any numeric type, widened to `f64`.
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// A reference into the target application's object model.
    Specifier(Box<ObjectSpecifier>),
    /// An ordered list.
    List(Vec<Value>),
    /// A keyed record, keys being four-char codes rendered as strings.
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The object specifier, if this is one.
    #[must_use]
    pub fn as_specifier(&self) -> Option<&ObjectSpecifier> {
        match self {
            Self::Specifier(spec) => Some(spec),
            _ => None,
        }
    }

    /// The list items, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The record entries, if this is a record.
    #[must_use]
    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Record(map) => Some(map),
            _ => None,
        }
    }

    /// Human-readable rendering.
    ///
    /// Object specifiers render as `"<class> <keyData> of <container>"`,
    /// numbers and booleans canonically, null as `"null"`. Lists and records
    /// render as compact JSON.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Specifier(spec) => spec.describe(),
            Self::List(_) | Self::Record(_) => serde_json::to_string(self).unwrap_or_else(|e| {
                trace!(error = %e, "value could not be rendered as JSON");
                String::new()
            }),
        }
    }

    /// Fill in the readable summary of every object specifier in this tree.
    pub fn summarize(&mut self) {
        match self {
            Self::Specifier(spec) => spec.summarize(),
            Self::List(items) => items.iter_mut().for_each(Self::summarize),
            Self::Record(map) => map.values_mut().for_each(Self::summarize),
            Self::Null | Self::String(_) | Self::Number(_) | Self::Bool(_) => {},
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Specifier(spec) => spec.serialize(serializer),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Self::Record(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<ObjectSpecifier> for Value {
    fn from(spec: ObjectSpecifier) -> Self {
        Self::Specifier(Box::new(spec))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            },
        }
    }
}
