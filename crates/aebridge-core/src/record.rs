//! One received Apple Event, fully decoded.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::Value;

/// Parameter key of the direct (primary) parameter.
pub const DIRECT_PARAMETER: &str = "----";

/// A decoded inbound event.
///
/// Built once by the extractor and read-only afterwards. `parameters` only
/// holds keys that were present in the event; an absent parameter is not the
/// same as a parameter that decoded to null.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    suite: String,
    event: String,
    parameters: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_app: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_app: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<i32>,
}

impl EventRecord {
    /// Start a record for the given suite and event codes.
    #[must_use]
    pub fn new(suite: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            event: event.into(),
            ..Self::default()
        }
    }

    /// Add a parameter. A repeated key replaces the earlier value.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Set the addressed application.
    #[must_use]
    pub fn with_target_app(mut self, target: impl Into<String>) -> Self {
        self.target_app = Some(target.into());
        self
    }

    /// Set the sending application.
    #[must_use]
    pub fn with_source_app(mut self, source: impl Into<String>) -> Self {
        self.source_app = Some(source.into());
        self
    }

    /// Set the transaction id.
    #[must_use]
    pub fn with_transaction_id(mut self, id: i32) -> Self {
        self.transaction_id = Some(id);
        self
    }

    /// Suite (event class) code.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Event id code.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// All decoded parameters keyed by four-char code.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    /// A single parameter.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// The direct parameter (`"----"`).
    #[must_use]
    pub fn direct_parameter(&self) -> Option<&Value> {
        self.parameter(DIRECT_PARAMETER)
    }

    /// The addressed application, when it could be resolved.
    #[must_use]
    pub fn target_app(&self) -> Option<&str> {
        self.target_app.as_deref()
    }

    /// The sending application, when it could be resolved.
    #[must_use]
    pub fn source_app(&self) -> Option<&str> {
        self.source_app.as_deref()
    }

    /// Transaction id, when the OS attached one.
    #[must_use]
    pub fn transaction_id(&self) -> Option<i32> {
        self.transaction_id
    }
}
