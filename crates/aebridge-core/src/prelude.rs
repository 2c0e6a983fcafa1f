//! Prelude module - commonly used types for convenient import.
//!
//! Use `use aebridge_core::prelude::*;` to import all essential types.

// Codes
pub use crate::{FourCharCode, InvalidFourCharCode, code_to_string, string_to_code};

// Values
pub use crate::{ObjectSpecifier, Value};

// Records
pub use crate::{DIRECT_PARAMETER, EventRecord};
