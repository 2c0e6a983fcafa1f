//! aebridge Test - shared test utilities.
//!
//! Mock OS seam, event and descriptor fixtures, and harness helpers, for
//! use as a dev-dependency.
//!
//! ```rust,ignore
//! use aebridge_test::{MockEventManager, MockReply, open_location_event};
//! use aebridge_events::{EventBridge, channel};
//!
//! let bridge = EventBridge::new(MockEventManager::new());
//! let (dispatcher, mut queue) = channel(8);
//! bridge.set_dispatcher(dispatcher);
//! bridge.handle_event(&open_location_event("https://example.com"), Some(MockReply::new()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
