//! aebridge Core - the value model shared by every aebridge crate.
//!
//! This crate provides:
//! - [`FourCharCode`] and the string/integer codec for four-char codes
//! - [`Value`], the decoded, language-agnostic value tree
//! - [`ObjectSpecifier`] and its readable summary
//! - [`EventRecord`], one decoded inbound Apple Event
//!
//! Every type here serializes with `serde` into the shape host runtimes
//! consume: camelCase field names, absent fields omitted, decoded nulls
//! kept as `null`.
//!
//! # Example
//!
//! ```rust
//! use aebridge_core::{FourCharCode, ObjectSpecifier, Value};
//!
//! let tab = ObjectSpecifier::new()
//!     .with_object_class("cTab")
//!     .with_key_form("indx")
//!     .with_key_data(1);
//! let url = ObjectSpecifier::new()
//!     .with_object_class("prop")
//!     .with_key_code(FourCharCode::from_bytes(*b"URL "))
//!     .with_container(tab);
//!
//! assert_eq!(url.describe(), "prop URL  of cTab 1");
//! assert_eq!(Value::from(42).describe(), "42");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod fourcc;
mod record;
mod specifier;
mod value;

pub use error::InvalidFourCharCode;
pub use fourcc::{FourCharCode, code_to_string, string_to_code};
pub use record::{DIRECT_PARAMETER, EventRecord};
pub use specifier::{OBJECT_SPECIFIER_TYPE, ObjectSpecifier};
pub use value::Value;
