//! In-memory inbound events.

use std::collections::HashMap;

use aebridge_core::FourCharCode;
use aebridge_descriptor::MemoryDescriptor;

use crate::backend::InboundEvent;
use crate::keywords::{
    KEY_ADDRESS_ATTR, KEY_EVENT_CLASS_ATTR, KEY_EVENT_ID_ATTR, KEY_ORIGINAL_ADDRESS_ATTR,
    KEY_SENDER_PID_ATTR, KEY_TRANSACTION_ID_ATTR, TYPE_APPLICATION_BUNDLE_ID,
    TYPE_KERNEL_PROCESS_ID,
};

/// An owned Apple Event made of [`MemoryDescriptor`] attributes and
/// parameters.
///
/// Used to replay captured events and to drive the bridge without the OS.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryEvent {
    attributes: HashMap<FourCharCode, MemoryDescriptor>,
    parameters: HashMap<FourCharCode, MemoryDescriptor>,
}

impl MemoryEvent {
    /// An event carrying only its class and id attributes.
    #[must_use]
    pub fn new(suite: FourCharCode, event: FourCharCode) -> Self {
        Self::default()
            .with_attribute(KEY_EVENT_CLASS_ATTR, MemoryDescriptor::type_code(suite))
            .with_attribute(KEY_EVENT_ID_ATTR, MemoryDescriptor::type_code(event))
    }

    /// Set an arbitrary attribute.
    #[must_use]
    pub fn with_attribute(mut self, keyword: FourCharCode, desc: MemoryDescriptor) -> Self {
        self.attributes.insert(keyword, desc);
        self
    }

    /// Set an arbitrary parameter.
    #[must_use]
    pub fn with_parameter(mut self, keyword: FourCharCode, desc: MemoryDescriptor) -> Self {
        self.parameters.insert(keyword, desc);
        self
    }

    /// Set the transaction id attribute.
    #[must_use]
    pub fn with_transaction_id(self, id: i32) -> Self {
        self.with_attribute(KEY_TRANSACTION_ID_ATTR, MemoryDescriptor::sint32(id))
    }

    /// Address the event to an application by bundle identifier.
    #[must_use]
    pub fn with_target_bundle(self, bundle_id: &str) -> Self {
        self.with_attribute(KEY_ADDRESS_ATTR, bundle_descriptor(bundle_id))
    }

    /// Address the event to a process id.
    #[must_use]
    pub fn with_target_pid(self, pid: i32) -> Self {
        self.with_attribute(KEY_ADDRESS_ATTR, pid_descriptor(pid))
    }

    /// Mark the sender by bundle identifier.
    #[must_use]
    pub fn with_source_bundle(self, bundle_id: &str) -> Self {
        self.with_attribute(KEY_ORIGINAL_ADDRESS_ATTR, bundle_descriptor(bundle_id))
    }

    /// Mark the sender by process id.
    #[must_use]
    pub fn with_sender_pid(self, pid: i32) -> Self {
        self.with_attribute(KEY_SENDER_PID_ATTR, MemoryDescriptor::sint32(pid))
    }
}

fn bundle_descriptor(bundle_id: &str) -> MemoryDescriptor {
    MemoryDescriptor::raw(TYPE_APPLICATION_BUNDLE_ID, bundle_id.as_bytes())
}

fn pid_descriptor(pid: i32) -> MemoryDescriptor {
    MemoryDescriptor::raw(TYPE_KERNEL_PROCESS_ID, pid.to_ne_bytes())
}

impl InboundEvent for MemoryEvent {
    type Descriptor = MemoryDescriptor;

    fn attribute(&self, keyword: FourCharCode) -> Option<MemoryDescriptor> {
        self.attributes.get(&keyword).cloned()
    }

    fn parameter(&self, keyword: FourCharCode) -> Option<MemoryDescriptor> {
        self.parameters.get(&keyword).cloned()
    }
}
