//! Prelude module - commonly used types for convenient import.
//!
//! Use `use aebridge_descriptor::prelude::*;` to import all essential types.

// Access
pub use crate::{Descriptor, MemoryDescriptor};

// Decoding
pub use crate::{BINARY_PLACEHOLDER, Decoder};
