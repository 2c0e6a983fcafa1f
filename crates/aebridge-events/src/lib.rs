//! aebridge Events - receiving Apple Events and answering them later.
//!
//! This crate provides:
//! - The OS seam: [`EventManager`], [`InboundEvent`] and [`ReplySlot`]
//! - [`EventExtractor`], building an [`EventRecord`] from an inbound event
//! - [`EventBridge`], the per-event controller: dispatch without a reply, or
//!   suspend, dispatch and resume once the host answers
//! - [`Completer`] and [`PendingReply`], which resume a suspended event
//!   exactly once whatever happens to them
//! - [`channel`], a bounded queue carrying [`Dispatch`]es to the host
//! - The macOS backend in [`platform`]
//!
//! # Example
//!
//! ```rust,ignore
//! use aebridge_events::{EventBridge, channel};
//! use aebridge_events::platform::macos;
//!
//! let bridge = macos::bridge();
//! let (dispatcher, mut queue) = channel(256);
//! bridge.set_dispatcher(dispatcher);
//! bridge.install_handler_str("core", "getd")?;
//!
//! while let Some(dispatch) = queue.recv().await {
//!     let (record, completer) = dispatch.into_parts();
//!     if let Some(completer) = completer {
//!         completer.reply(format!("got {}", record.event()));
//!     }
//! }
//! ```
//!
//! [`EventRecord`]: aebridge_core::EventRecord

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod keywords;
pub mod platform;
pub mod prelude;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

mod backend;
mod bridge;
mod dispatcher;
mod error;
mod extractor;
mod memory;
mod pending;
mod reply;
mod status;

pub use backend::{EventManager, InboundEvent, ReplySlot};
pub use bridge::{BridgeOptions, CallbackStatus, EventBridge};
pub use dispatcher::{
    ChannelDispatcher, Dispatch, DispatchError, DispatchQueue, DispatchRejected, Dispatcher,
    channel,
};
pub use error::{BridgeError, BridgeResult};
pub use extractor::{EventExtractor, resolve_address};
pub use memory::MemoryEvent;
pub use pending::{Completer, DROPPED_REPLY_MESSAGE, PendingReply};
pub use reply::{ReplyOutcome, ReplyValue};
pub use status::OsStatus;
