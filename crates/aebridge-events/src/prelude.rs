//! Prelude module - commonly used types for convenient import.
//!
//! Use `use aebridge_events::prelude::*;` to import all essential types.

// Controller
pub use crate::{BridgeError, BridgeOptions, BridgeResult, CallbackStatus, EventBridge};

// Dispatch
pub use crate::{Completer, Dispatch, DispatchQueue, Dispatcher, channel};

// OS seam
pub use crate::{EventManager, InboundEvent, MemoryEvent, OsStatus, ReplySlot};
