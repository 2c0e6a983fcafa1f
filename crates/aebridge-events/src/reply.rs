//! Encoding a handler outcome into the reply event.

use aebridge_core::Value;
use tracing::{trace, warn};

use crate::backend::ReplySlot;
use crate::keywords::{KEY_DIRECT_OBJECT, KEY_ERROR_STRING};
use crate::status::OsStatus;

/// A scalar written into a reply parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyValue {
    /// `typeUTF8Text`.
    Text(String),
    /// `typeSInt32`.
    Integer(i32),
    /// `typeIEEE64BitFloatingPoint`.
    Float(f64),
    /// `typeBoolean`.
    Boolean(bool),
    /// `typeNull`.
    Null,
}

impl ReplyValue {
    /// Map a handler result onto the reply encoding.
    ///
    /// Whole numbers that fit an `i32` are written as integers, every other
    /// number as a float. Lists, records and specifiers are written as their
    /// JSON text.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Text(s.clone()),
            Value::Bool(b) => Self::Boolean(*b),
            Value::Number(n) => number(*n),
            Value::Specifier(_) | Value::List(_) | Value::Record(_) => {
                Self::Text(serde_json::to_string(value).unwrap_or_else(|e| {
                    trace!(error = %e, "composite reply could not be rendered as JSON");
                    String::new()
                }))
            },
        }
    }
}

/// Whole numbers outside the `i32` range are written as floats, not
/// truncated to a 32-bit integer.
#[allow(clippy::cast_possible_truncation)]
fn number(n: f64) -> ReplyValue {
    let whole = n.is_finite() && n.fract() == 0.0;
    if whole && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
        ReplyValue::Integer(n as i32)
    } else {
        ReplyValue::Float(n)
    }
}

/// What a handler produced for a reply-expecting event.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The handler failed; the message goes into the error-string slot.
    Error(String),
    /// The handler produced a value for the direct-parameter slot.
    Value(Value),
    /// Nothing to write; the reply keeps the OS default.
    Empty,
}

impl ReplyOutcome {
    /// Build an outcome from the `(error, result)` pair handed to a
    /// completion callback. An error wins over a result.
    #[must_use]
    pub fn from_parts(error: Option<String>, result: Option<Value>) -> Self {
        match (error, result) {
            (Some(message), _) => Self::Error(message),
            (None, Some(value)) => Self::Value(value),
            (None, None) => Self::Empty,
        }
    }

    /// The status reported when resuming with this outcome.
    #[must_use]
    pub fn status(&self) -> OsStatus {
        match self {
            Self::Error(_) => OsStatus::EVENT_FAILED,
            Self::Value(_) | Self::Empty => OsStatus::NO_ERR,
        }
    }

    /// Write the outcome into `reply` and return the status to resume with.
    ///
    /// A rejected write is logged; the outcome status is still returned so
    /// the sender learns whether the handler succeeded.
    pub fn write_to<R: ReplySlot>(&self, reply: &mut R) -> OsStatus {
        let written = match self {
            Self::Error(message) => {
                reply.put_parameter(KEY_ERROR_STRING, &ReplyValue::Text(message.clone()))
            },
            Self::Value(value) => {
                reply.put_parameter(KEY_DIRECT_OBJECT, &ReplyValue::from_value(value))
            },
            Self::Empty => Ok(()),
        };
        if let Err(status) = written {
            warn!(%status, "Failed to write reply parameter");
        }
        self.status()
    }
}
