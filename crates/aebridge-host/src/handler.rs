//! Async event handlers.

use std::future::Future;

use aebridge_core::EventRecord;
use async_trait::async_trait;

use crate::error::HandlerResult;

/// Handles one routed event.
///
/// `Some(json)` becomes the reply's direct parameter, JSON `null` included.
/// `None` leaves the reply empty. Results are ignored for events whose
/// sender does not wait.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Handle `record`.
    async fn handle(&self, record: EventRecord) -> HandlerResult<Option<serde_json::Value>>;
}

#[async_trait]
impl<F, Fut> EventHandler for F
where
    F: Fn(EventRecord) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<Option<serde_json::Value>>> + Send + 'static,
{
    async fn handle(&self, record: EventRecord) -> HandlerResult<Option<serde_json::Value>> {
        self(record).await
    }
}
