//! Four-character codes.
//!
//! Apple Events address suites, events, parameters and descriptor types with
//! 32-bit codes that are conventionally written as four Latin-1 characters
//! (`'core'`, `'getd'`, `'----'`). The integer form is big-endian: the first
//! character is the most significant byte.
//!
//! Conversion to text is total. Every byte maps to the Unicode scalar with
//! the same value, so non-printable bytes survive a round trip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidFourCharCode;

/// A 32-bit four-character code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FourCharCode(u32);

impl FourCharCode {
    /// The wildcard code `'****'`.
    pub const WILDCARD: Self = Self::from_bytes(*b"****");

    /// Wrap a raw big-endian code.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Build a code from its four bytes, first character first.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// The raw integer value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The four bytes, first character first.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Parse a four-character string.
    ///
    /// Returns `None` unless `s` is exactly four characters, each in the
    /// Latin-1 range. Callers treat `None` as "matches nothing".
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        string_to_code(s).map(Self)
    }

    /// Hex rendering used for debugging, e.g. `0x55524c20`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:#010x}", self.0)
    }

    /// Whether this is the `'****'` wildcard.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        self.0 == Self::WILDCARD.0
    }
}

/// Render a big-endian code as its four-character string.
#[must_use]
pub fn code_to_string(code: u32) -> String {
    code.to_be_bytes().iter().map(|&b| char::from(b)).collect()
}

/// Parse a four-character string into its big-endian code.
///
/// Returns `None` when the string is not exactly four characters or contains
/// a character outside Latin-1.
#[must_use]
pub fn string_to_code(s: &str) -> Option<u32> {
    let mut bytes = [0u8; 4];
    let mut chars = s.chars();
    for slot in &mut bytes {
        *slot = u8::try_from(u32::from(chars.next()?)).ok()?;
    }
    if chars.next().is_some() {
        return None;
    }
    Some(u32::from_be_bytes(bytes))
}

impl fmt::Display for FourCharCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&code_to_string(self.0))
    }
}

impl fmt::Debug for FourCharCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", code_to_string(self.0))
    }
}

impl From<u32> for FourCharCode {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<FourCharCode> for u32 {
    fn from(code: FourCharCode) -> Self {
        code.0
    }
}

impl FromStr for FourCharCode {
    type Err = InvalidFourCharCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidFourCharCode::new(s))
    }
}

impl TryFrom<&str> for FourCharCode {
    type Error = InvalidFourCharCode;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for FourCharCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&code_to_string(self.0))
    }
}

impl<'de> Deserialize<'de> for FourCharCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
