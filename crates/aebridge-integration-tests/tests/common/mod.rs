//! Shared wiring for integration tests.

use std::sync::Arc;

use aebridge_events::keywords::{KEY_DIRECT_OBJECT, KEY_ERROR_STRING};
use aebridge_events::{BridgeOptions, CallbackStatus, DispatchQueue, EventBridge, ReplyValue, channel};
use aebridge_test::{MockEvent, MockEventManager, MockReply, ResumeRecord, setup_test_logging_default};

/// A mock-backed bridge wired to a channel dispatcher.
#[allow(dead_code)]
pub struct Harness {
    pub bridge: Arc<EventBridge<MockEventManager>>,
    pub queue: DispatchQueue,
}

#[allow(dead_code)]
impl Harness {
    pub fn new(capacity: usize) -> Self {
        Self::with_options(capacity, BridgeOptions::default())
    }

    pub fn with_options(capacity: usize, options: BridgeOptions) -> Self {
        setup_test_logging_default();
        let bridge = Arc::new(EventBridge::with_options(MockEventManager::new(), options));
        let (dispatcher, queue) = channel(capacity);
        bridge.set_dispatcher(dispatcher);
        Self { bridge, queue }
    }

    /// Deliver `event` as a request expecting a reply.
    pub fn request(&self, event: &MockEvent) -> CallbackStatus {
        self.bridge.handle_event(event, Some(MockReply::new()))
    }

    /// Deliver `event` without a reply slot.
    pub fn notify(&self, event: &MockEvent) -> CallbackStatus {
        self.bridge.handle_event(event, None)
    }

    pub fn manager(&self) -> &MockEventManager {
        self.bridge.manager()
    }

    pub fn resumes(&self) -> Vec<ResumeRecord> {
        self.manager().resumes()
    }
}

/// The error string written into a resumed reply.
#[allow(dead_code)]
pub fn error_string(record: &ResumeRecord) -> Option<String> {
    match record.reply.parameter(KEY_ERROR_STRING)? {
        ReplyValue::Text(text) => Some(text.clone()),
        _ => None,
    }
}

/// The direct parameter written into a resumed reply.
#[allow(dead_code)]
pub fn direct_value(record: &ResumeRecord) -> Option<ReplyValue> {
    record.reply.parameter(KEY_DIRECT_OBJECT).cloned()
}
