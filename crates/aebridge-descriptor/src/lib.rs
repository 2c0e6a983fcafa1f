//! aebridge Descriptor - reading and decoding Apple Event descriptors.
//!
//! This crate provides:
//! - The [`Descriptor`] trait, the read-only seam over OS descriptors
//! - [`MemoryDescriptor`], an owned descriptor tree for tests and replay
//! - [`Decoder`], the recursive descriptor-to-[`Value`] conversion
//! - Descriptor type tags and object-specifier keywords in [`types`]
//!
//! # Decoding rules
//!
//! | Declared type | Decoded as |
//! |---------------|------------|
//! | `TEXT`, `utf8`, `utxt` | string |
//! | `shor`, `long`, `doub` | number |
//! | `bool`, `true`, `fals` | boolean |
//! | `null` | null |
//! | `type`, `enum`, `keyw`, `abso` | four-char string |
//! | `obj ` | object specifier |
//! | `list` | list |
//! | `reco` | record |
//! | anything else | text if small and readable, else `"<binary data>"` |
//!
//! # Example
//!
//! ```rust
//! use aebridge_descriptor::{Decoder, MemoryDescriptor};
//! use aebridge_core::Value;
//!
//! let desc = MemoryDescriptor::list([MemoryDescriptor::utf8("a"), MemoryDescriptor::sint32(2)]);
//! let value = Decoder::new().decode(&desc);
//! assert_eq!(value, Value::List(vec![Value::from("a"), Value::from(2)]));
//! ```
//!
//! [`Value`]: aebridge_core::Value

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;
pub mod types;

mod decoder;
mod descriptor;
mod memory;

pub use decoder::{BINARY_PLACEHOLDER, DEFAULT_INLINE_TEXT_LIMIT, DEFAULT_MAX_DEPTH, Decoder};
pub use descriptor::Descriptor;
pub use memory::MemoryDescriptor;
