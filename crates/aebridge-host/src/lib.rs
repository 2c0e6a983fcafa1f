//! aebridge Host - answering Apple Events from async Rust.
//!
//! This crate provides:
//! - [`EventHandler`], implemented by async closures over an
//!   [`EventRecord`](aebridge_core::EventRecord)
//! - [`Router`], mapping `(suite, event)` pairs (with `'****'` wildcards) to
//!   handlers, registering them with an
//!   [`EventBridge`](aebridge_events::EventBridge) and serving its dispatch
//!   queue
//! - [`config_bridge`], turning a loaded configuration into bridge options
//!
//! # Example
//!
//! ```rust,no_run
//! use aebridge_core::EventRecord;
//! use aebridge_events::{EventBridge, channel, testing::MockEventManager};
//! use aebridge_host::{HandlerError, Router};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let bridge = EventBridge::new(MockEventManager::new());
//! let (dispatcher, queue) = channel(64);
//! bridge.set_dispatcher(dispatcher);
//!
//! let mut router = Router::new();
//! router.on("GURL", "GURL", |record: EventRecord| async move {
//!     let url = record.direct_parameter().and_then(|v| v.as_str()).unwrap_or_default();
//!     Ok::<_, HandlerError>(Some(serde_json::json!(format!("opened {url}"))))
//! })?;
//! router.install_all(&bridge)?;
//! router.serve(queue).await;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config_bridge;

mod error;
mod handler;
mod router;

pub use error::{HandlerError, HandlerResult, HostError, HostResult};
pub use handler::EventHandler;
pub use router::Router;
