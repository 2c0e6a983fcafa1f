//! Descriptor type tags and object-specifier keywords.
//!
//! Values follow the Apple Event Manager headers (`AEDataModel.h`,
//! `AEObjects.h`, `AERegistry.h`).

use aebridge_core::FourCharCode;

const fn code(bytes: &[u8; 4]) -> FourCharCode {
    FourCharCode::from_bytes(*bytes)
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// `typeChar`, legacy 8-bit text.
pub const TYPE_CHAR: FourCharCode = code(b"TEXT");
/// `typeUTF8Text`.
pub const TYPE_UTF8_TEXT: FourCharCode = code(b"utf8");
/// `typeUnicodeText`, native-endian UTF-16.
pub const TYPE_UNICODE_TEXT: FourCharCode = code(b"utxt");

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// `typeSInt16`.
pub const TYPE_SINT16: FourCharCode = code(b"shor");
/// `typeSInt32`.
pub const TYPE_SINT32: FourCharCode = code(b"long");
/// `typeIEEE64BitFloatingPoint`.
pub const TYPE_IEEE64_FLOAT: FourCharCode = code(b"doub");
/// `typeBoolean`, one byte.
pub const TYPE_BOOLEAN: FourCharCode = code(b"bool");
/// `typeTrue`, no data.
pub const TYPE_TRUE: FourCharCode = code(b"true");
/// `typeFalse`, no data.
pub const TYPE_FALSE: FourCharCode = code(b"fals");
/// `typeNull`.
pub const TYPE_NULL: FourCharCode = code(b"null");

// ---------------------------------------------------------------------------
// Four-char code payloads
// ---------------------------------------------------------------------------

/// `typeType`.
pub const TYPE_TYPE: FourCharCode = code(b"type");
/// `typeEnumerated`.
pub const TYPE_ENUMERATED: FourCharCode = code(b"enum");
/// `typeKeyword`.
pub const TYPE_KEYWORD: FourCharCode = code(b"keyw");
/// `typeAbsoluteOrdinal`.
pub const TYPE_ABSOLUTE_ORDINAL: FourCharCode = code(b"abso");

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

/// `typeAEList`.
pub const TYPE_LIST: FourCharCode = code(b"list");
/// `typeAERecord`.
pub const TYPE_RECORD: FourCharCode = code(b"reco");
/// `typeObjectSpecifier`.
pub const TYPE_OBJECT_SPECIFIER: FourCharCode = code(b"obj ");
/// `typeWildCard`, also the keyword reported for list items.
pub const TYPE_WILDCARD: FourCharCode = code(b"****");

// ---------------------------------------------------------------------------
// Object specifier keywords
// ---------------------------------------------------------------------------

/// `keyAEDesiredClass`.
pub const KEY_DESIRED_CLASS: FourCharCode = code(b"want");
/// `keyAEKeyForm`.
pub const KEY_KEY_FORM: FourCharCode = code(b"form");
/// `keyAEKeyData`.
pub const KEY_KEY_DATA: FourCharCode = code(b"seld");
/// `keyAEContainer`.
pub const KEY_CONTAINER: FourCharCode = code(b"from");

/// Whether descriptors of this type carry text.
#[must_use]
pub fn is_text_type(ty: FourCharCode) -> bool {
    matches!(ty, TYPE_CHAR | TYPE_UTF8_TEXT | TYPE_UNICODE_TEXT)
}

/// Whether descriptors of this type carry a single four-char code.
#[must_use]
pub fn is_code_type(ty: FourCharCode) -> bool {
    matches!(
        ty,
        TYPE_TYPE | TYPE_ENUMERATED | TYPE_KEYWORD | TYPE_ABSOLUTE_ORDINAL
    )
}
