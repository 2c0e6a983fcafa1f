//! Raw FFI declarations for the Apple Event Manager (`CoreServices`).
//!
//! Only the calls the bridge needs are declared: handler installation,
//! descriptor access, suspend/resume and reply writing. Every item is
//! `#[repr(C)]` or a bare function as defined in `AEDataModel.h`,
//! `AEInteraction.h` and `AppleEvents.h`. Safe wrappers live in
//! `aebridge-events`.
//!
//! On targets other than macOS this crate is empty.

#![allow(unsafe_code)]
#![allow(missing_docs)]
#![allow(non_snake_case, non_upper_case_globals)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::*;
