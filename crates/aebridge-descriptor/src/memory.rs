//! In-memory descriptor trees.
//!
//! [`MemoryDescriptor`] mirrors the shape of Apple Event Manager descriptors
//! without touching the OS. Scalars are stored in native byte order, exactly
//! as `AEGetDescData` hands them out, so the decoder reads both the same way.

use aebridge_core::FourCharCode;

use crate::descriptor::Descriptor;
use crate::types::{
    TYPE_BOOLEAN, TYPE_ENUMERATED, TYPE_IEEE64_FLOAT, TYPE_LIST, TYPE_NULL, TYPE_OBJECT_SPECIFIER,
    TYPE_RECORD, TYPE_SINT16, TYPE_SINT32, TYPE_TYPE, TYPE_UNICODE_TEXT, TYPE_UTF8_TEXT,
    TYPE_WILDCARD,
};

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Bytes(Vec<u8>),
    List(Vec<MemoryDescriptor>),
    Record(Vec<(FourCharCode, MemoryDescriptor)>),
    Unreadable,
}

/// An owned descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDescriptor {
    descriptor_type: FourCharCode,
    body: Body,
}

impl MemoryDescriptor {
    /// A descriptor with an arbitrary type and raw payload.
    #[must_use]
    pub fn raw(descriptor_type: FourCharCode, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            descriptor_type,
            body: Body::Bytes(bytes.into()),
        }
    }

    /// A descriptor whose every read fails, for exercising degraded paths.
    #[must_use]
    pub fn unreadable(descriptor_type: FourCharCode) -> Self {
        Self {
            descriptor_type,
            body: Body::Unreadable,
        }
    }

    /// `typeNull`.
    #[must_use]
    pub fn null() -> Self {
        Self::raw(TYPE_NULL, Vec::new())
    }

    /// UTF-8 text.
    #[must_use]
    pub fn utf8(text: &str) -> Self {
        Self::raw(TYPE_UTF8_TEXT, text.as_bytes())
    }

    /// Native-endian UTF-16 text (`typeUnicodeText`).
    #[must_use]
    pub fn unicode_text(text: &str) -> Self {
        let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_ne_bytes).collect();
        Self::raw(TYPE_UNICODE_TEXT, bytes)
    }

    /// A 16-bit signed integer.
    #[must_use]
    pub fn sint16(n: i16) -> Self {
        Self::raw(TYPE_SINT16, n.to_ne_bytes())
    }

    /// A 32-bit signed integer.
    #[must_use]
    pub fn sint32(n: i32) -> Self {
        Self::raw(TYPE_SINT32, n.to_ne_bytes())
    }

    /// A 64-bit float.
    #[must_use]
    pub fn float64(n: f64) -> Self {
        Self::raw(TYPE_IEEE64_FLOAT, n.to_ne_bytes())
    }

    /// A one-byte boolean.
    #[must_use]
    pub fn boolean(b: bool) -> Self {
        Self::raw(TYPE_BOOLEAN, [u8::from(b)])
    }

    /// A four-char code payload under the given type.
    #[must_use]
    pub fn code(descriptor_type: FourCharCode, code: FourCharCode) -> Self {
        Self::raw(descriptor_type, code.as_u32().to_ne_bytes())
    }

    /// A `typeType` code.
    #[must_use]
    pub fn type_code(code: FourCharCode) -> Self {
        Self::code(TYPE_TYPE, code)
    }

    /// A `typeEnumerated` code.
    #[must_use]
    pub fn enumerated(code: FourCharCode) -> Self {
        Self::code(TYPE_ENUMERATED, code)
    }

    /// A `typeAEList`.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = MemoryDescriptor>) -> Self {
        Self {
            descriptor_type: TYPE_LIST,
            body: Body::List(items.into_iter().collect()),
        }
    }

    /// A `typeAERecord`.
    #[must_use]
    pub fn record(entries: impl IntoIterator<Item = (FourCharCode, MemoryDescriptor)>) -> Self {
        Self {
            descriptor_type: TYPE_RECORD,
            body: Body::Record(entries.into_iter().collect()),
        }
    }

    /// A `typeObjectSpecifier` built from its keyed sub-fields.
    #[must_use]
    pub fn object_specifier(
        entries: impl IntoIterator<Item = (FourCharCode, MemoryDescriptor)>,
    ) -> Self {
        Self::record(entries).with_type(TYPE_OBJECT_SPECIFIER)
    }

    /// Relabel the descriptor type, keeping the payload.
    #[must_use]
    pub fn with_type(mut self, descriptor_type: FourCharCode) -> Self {
        self.descriptor_type = descriptor_type;
        self
    }
}

impl Descriptor for MemoryDescriptor {
    fn descriptor_type(&self) -> FourCharCode {
        self.descriptor_type
    }

    fn data_size(&self) -> usize {
        match &self.body {
            Body::Bytes(bytes) => bytes.len(),
            Body::List(_) | Body::Record(_) | Body::Unreadable => 0,
        }
    }

    fn data(&self) -> Option<Vec<u8>> {
        match &self.body {
            Body::Bytes(bytes) => Some(bytes.clone()),
            Body::List(_) | Body::Record(_) | Body::Unreadable => None,
        }
    }

    fn text(&self) -> Option<String> {
        let Body::Bytes(bytes) = &self.body else {
            return None;
        };
        if self.descriptor_type == TYPE_UNICODE_TEXT {
            let units: Vec<u16> = bytes
                .chunks(2)
                .map(|pair| <[u8; 2]>::try_from(pair).map(u16::from_ne_bytes))
                .collect::<Result<_, _>>()
                .ok()?;
            String::from_utf16(&units).ok()
        } else {
            String::from_utf8(bytes.clone()).ok()
        }
    }

    fn count_items(&self) -> Option<usize> {
        match &self.body {
            Body::List(items) => Some(items.len()),
            Body::Record(entries) => Some(entries.len()),
            Body::Bytes(_) | Body::Unreadable => None,
        }
    }

    fn nth_item(&self, index: usize) -> Option<(FourCharCode, Self)> {
        let offset = index.checked_sub(1)?;
        match &self.body {
            Body::List(items) => items.get(offset).map(|item| (TYPE_WILDCARD, item.clone())),
            Body::Record(entries) => entries.get(offset).cloned(),
            Body::Bytes(_) | Body::Unreadable => None,
        }
    }

    fn key(&self, keyword: FourCharCode) -> Option<Self> {
        let Body::Record(entries) = &self.body else {
            return None;
        };
        entries
            .iter()
            .find(|(key, _)| *key == keyword)
            .map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KEY_DESIRED_CLASS;

    fn code(s: &str) -> FourCharCode {
        FourCharCode::parse(s).unwrap()
    }

    #[test]
    fn test_scalars_round_trip_through_reads() {
        assert_eq!(MemoryDescriptor::sint16(-7).read_i16(), Some(-7));
        assert_eq!(MemoryDescriptor::sint32(1 << 20).read_i32(), Some(1 << 20));
        assert_eq!(MemoryDescriptor::float64(0.5).read_f64(), Some(0.5));
        assert_eq!(MemoryDescriptor::boolean(true).read_bool(), Some(true));
        assert_eq!(
            MemoryDescriptor::type_code(code("cwin")).read_code(),
            Some(code("cwin"))
        );
    }

    #[test]
    fn test_wrong_width_reads_fail() {
        let desc = MemoryDescriptor::raw(TYPE_SINT32, vec![1, 2]);
        assert_eq!(desc.read_i32(), None);
        assert_eq!(desc.read_code(), None);
    }

    #[test]
    fn test_text_encodings() {
        assert_eq!(MemoryDescriptor::utf8("héllo").text().as_deref(), Some("héllo"));
        assert_eq!(
            MemoryDescriptor::unicode_text("tab ✓").text().as_deref(),
            Some("tab ✓")
        );
        assert_eq!(MemoryDescriptor::raw(TYPE_UTF8_TEXT, vec![0xff, 0xfe]).text(), None);
        assert_eq!(MemoryDescriptor::raw(TYPE_UNICODE_TEXT, vec![0x41]).text(), None);
    }

    #[test]
    fn test_items_are_one_based() {
        let list = MemoryDescriptor::list([MemoryDescriptor::sint32(1), MemoryDescriptor::sint32(2)]);
        assert_eq!(list.count_items(), Some(2));
        assert!(list.nth_item(0).is_none());
        let (keyword, first) = list.nth_item(1).unwrap();
        assert_eq!(keyword, TYPE_WILDCARD);
        assert_eq!(first.read_i32(), Some(1));
        assert!(list.nth_item(3).is_none());
    }

    #[test]
    fn test_record_key_lookup() {
        let spec = MemoryDescriptor::object_specifier([(
            KEY_DESIRED_CLASS,
            MemoryDescriptor::type_code(code("cwin")),
        )]);
        assert_eq!(spec.descriptor_type(), TYPE_OBJECT_SPECIFIER);
        assert!(spec.key(KEY_DESIRED_CLASS).is_some());
        assert!(spec.key(code("seld")).is_none());
    }

    #[test]
    fn test_unreadable_fails_everything() {
        let desc = MemoryDescriptor::unreadable(TYPE_SINT32);
        assert_eq!(desc.data(), None);
        assert_eq!(desc.text(), None);
        assert_eq!(desc.count_items(), None);
        assert_eq!(desc.data_size(), 0);
    }
}
