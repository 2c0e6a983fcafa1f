//! Read access to an opaque descriptor.

use aebridge_core::FourCharCode;

/// Read-only view of one descriptor: a type tag plus an opaque payload,
/// possibly a list or keyed record of further descriptors.
///
/// Every accessor reports failure as `None`. Implementations never panic on
/// malformed input; the decoder turns `None` into an absent or null field.
pub trait Descriptor: Sized {
    /// The declared type tag.
    fn descriptor_type(&self) -> FourCharCode;

    /// Size of the flat payload in bytes, `0` for composites.
    fn data_size(&self) -> usize;

    /// Copy out the flat payload.
    fn data(&self) -> Option<Vec<u8>>;

    /// Coerce the descriptor to UTF-8 text.
    fn text(&self) -> Option<String>;

    /// Number of items in a list or record.
    fn count_items(&self) -> Option<usize>;

    /// The item at a 1-based `index`, with its keyword.
    ///
    /// List items report [`TYPE_WILDCARD`](crate::types::TYPE_WILDCARD) as
    /// their keyword.
    fn nth_item(&self, index: usize) -> Option<(FourCharCode, Self)>;

    /// The value stored under `keyword` in a record-like descriptor.
    fn key(&self, keyword: FourCharCode) -> Option<Self>;

    /// Read the payload as a native-endian four-char code.
    fn read_code(&self) -> Option<FourCharCode> {
        let bytes: [u8; 4] = self.data()?.try_into().ok()?;
        Some(FourCharCode::new(u32::from_ne_bytes(bytes)))
    }

    /// Read the payload as a native-endian `i16`.
    fn read_i16(&self) -> Option<i16> {
        let bytes: [u8; 2] = self.data()?.try_into().ok()?;
        Some(i16::from_ne_bytes(bytes))
    }

    /// Read the payload as a native-endian `i32`.
    fn read_i32(&self) -> Option<i32> {
        let bytes: [u8; 4] = self.data()?.try_into().ok()?;
        Some(i32::from_ne_bytes(bytes))
    }

    /// Read the payload as a native-endian `f64`.
    fn read_f64(&self) -> Option<f64> {
        let bytes: [u8; 8] = self.data()?.try_into().ok()?;
        Some(f64::from_ne_bytes(bytes))
    }

    /// Read a one-byte boolean payload.
    fn read_bool(&self) -> Option<bool> {
        self.data()?.first().map(|&b| b != 0)
    }
}
