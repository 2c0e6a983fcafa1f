//! Recursive descriptor decoding.
//!
//! [`Decoder::decode`] is total: every descriptor produces a [`Value`], and a
//! read that fails degrades only the field it was reading.

use aebridge_core::{ObjectSpecifier, Value};
use tracing::trace;

use crate::descriptor::Descriptor;
use crate::types::{
    KEY_CONTAINER, KEY_DESIRED_CLASS, KEY_KEY_DATA, KEY_KEY_FORM, TYPE_BOOLEAN, TYPE_FALSE,
    TYPE_IEEE64_FLOAT, TYPE_LIST, TYPE_NULL, TYPE_OBJECT_SPECIFIER, TYPE_RECORD, TYPE_SINT16,
    TYPE_SINT32, TYPE_TRUE, is_code_type, is_text_type,
};

/// Payloads of unknown type at or above this size are never read as text.
pub const DEFAULT_INLINE_TEXT_LIMIT: usize = 1024;

/// Default nesting limit for lists, records and specifier chains.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Placeholder for payloads that cannot be shown as text.
pub const BINARY_PLACEHOLDER: &str = "<binary data>";

/// Converts descriptors into [`Value`] trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    inline_text_limit: usize,
    max_depth: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a decoder with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inline_text_limit: DEFAULT_INLINE_TEXT_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the size at which unknown payloads stop being tried as text.
    #[must_use]
    pub fn with_inline_text_limit(mut self, limit: usize) -> Self {
        self.inline_text_limit = limit;
        self
    }

    /// Set the maximum nesting depth. Deeper subtrees decode to null.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// The inline text limit.
    #[must_use]
    pub fn inline_text_limit(&self) -> usize {
        self.inline_text_limit
    }

    /// The maximum nesting depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode one descriptor.
    pub fn decode<D: Descriptor>(&self, desc: &D) -> Value {
        self.decode_at(desc, 0)
    }

    fn decode_at<D: Descriptor>(&self, desc: &D, depth: usize) -> Value {
        if depth > self.max_depth {
            trace!(depth, "descriptor nesting exceeds limit, decoding as null");
            return Value::Null;
        }

        let ty = desc.descriptor_type();
        match ty {
            TYPE_NULL => Value::Null,
            TYPE_SINT16 => desc.read_i16().map_or(Value::Null, |n| Value::Number(f64::from(n))),
            TYPE_SINT32 => desc.read_i32().map_or(Value::Null, |n| Value::Number(f64::from(n))),
            TYPE_IEEE64_FLOAT => desc.read_f64().map_or(Value::Null, Value::Number),
            TYPE_BOOLEAN => desc.read_bool().map_or(Value::Null, Value::Bool),
            TYPE_TRUE => Value::Bool(true),
            TYPE_FALSE => Value::Bool(false),
            TYPE_OBJECT_SPECIFIER => self.decode_specifier(desc, depth),
            TYPE_LIST => self.decode_list(desc, depth),
            TYPE_RECORD => self.decode_record(desc, depth),
            t if is_text_type(t) => desc.text().map_or(Value::Null, Value::String),
            t if is_code_type(t) => desc
                .read_code()
                .map_or(Value::Null, |code| Value::String(code.to_string())),
            _ => self.decode_unknown(desc),
        }
    }

    fn decode_specifier<D: Descriptor>(&self, desc: &D, depth: usize) -> Value {
        let next = depth.saturating_add(1);
        let mut spec = ObjectSpecifier::new();

        if let Some(class) = desc.key(KEY_DESIRED_CLASS).and_then(|d| d.read_code()) {
            spec = spec.with_object_class(class.to_string());
        }
        if let Some(form) = desc.key(KEY_KEY_FORM).and_then(|d| d.read_code()) {
            spec = spec.with_key_form(form.to_string());
        }
        if let Some(data) = desc.key(KEY_KEY_DATA) {
            if is_code_type(data.descriptor_type()) {
                if let Some(code) = data.read_code() {
                    spec = spec.with_key_code(code);
                }
            } else {
                spec = spec.with_key_data(self.decode_at(&data, next));
            }
        }
        if let Some(container) = desc.key(KEY_CONTAINER) {
            spec = spec.with_container(self.decode_at(&container, next));
        }

        Value::from(spec)
    }

    fn decode_list<D: Descriptor>(&self, desc: &D, depth: usize) -> Value {
        let Some(count) = desc.count_items() else {
            trace!("list item count unavailable");
            return Value::Null;
        };
        let next = depth.saturating_add(1);

        let items = (1..=count)
            .map(|index| {
                desc.nth_item(index)
                    .map_or(Value::Null, |(_, item)| self.decode_at(&item, next))
            })
            .collect();
        Value::List(items)
    }

    fn decode_record<D: Descriptor>(&self, desc: &D, depth: usize) -> Value {
        let Some(count) = desc.count_items() else {
            trace!("record item count unavailable");
            return Value::Null;
        };
        let next = depth.saturating_add(1);

        let entries = (1..=count)
            .filter_map(|index| desc.nth_item(index))
            .map(|(keyword, item)| (keyword.to_string(), self.decode_at(&item, next)))
            .collect();
        Value::Record(entries)
    }

    fn decode_unknown<D: Descriptor>(&self, desc: &D) -> Value {
        let size = desc.data_size();
        if size >= self.inline_text_limit {
            trace!(
                descriptor_type = %desc.descriptor_type(),
                size,
                "large payload of unknown type"
            );
            return Value::String(BINARY_PLACEHOLDER.to_owned());
        }
        let text = desc.data().and_then(|bytes| String::from_utf8(bytes).ok());
        if text.is_none() {
            trace!(descriptor_type = %desc.descriptor_type(), "unknown payload is not UTF-8");
        }
        Value::String(text.unwrap_or_else(|| BINARY_PLACEHOLDER.to_owned()))
    }
}
