//! OS backends.
//!
//! Only macOS has an Apple Event Manager. Elsewhere the bridge is driven
//! through [`MemoryEvent`](crate::MemoryEvent) and a custom
//! [`EventManager`](crate::EventManager).

#[cfg(target_os = "macos")]
pub mod macos;
