//! The seam between the bridge and the OS event manager.
//!
//! The bridge never touches OS handles directly. A backend supplies three
//! things: read access to an inbound event, a writable reply slot, and the
//! install / suspend / resume calls. The macOS backend lives in
//! [`platform`](crate::platform); tests use [`MemoryEvent`](crate::MemoryEvent)
//! with a mock manager.

use aebridge_core::FourCharCode;
use aebridge_descriptor::Descriptor;

use crate::reply::ReplyValue;
use crate::status::OsStatus;

/// Read access to one inbound Apple Event.
pub trait InboundEvent {
    /// Descriptor type handed out for attributes and parameters.
    type Descriptor: Descriptor;

    /// An event attribute (`'evcl'`, `'addr'`, ...), if present and readable.
    fn attribute(&self, keyword: FourCharCode) -> Option<Self::Descriptor>;

    /// An event parameter (`'----'`, `'kfil'`, ...), if present and readable.
    fn parameter(&self, keyword: FourCharCode) -> Option<Self::Descriptor>;
}

/// The reply event the OS allocated for a request that expects an answer.
pub trait ReplySlot: Send + 'static {
    /// Write one parameter into the reply.
    ///
    /// # Errors
    ///
    /// Returns the OS status when the write is rejected.
    fn put_parameter(&mut self, keyword: FourCharCode, value: &ReplyValue) -> Result<(), OsStatus>;
}

/// Install, suspend and resume against the OS event manager.
///
/// Implementations are shared across threads: installation happens at
/// startup, suspension on the OS event thread, resumption from whichever
/// task completes the handler.
pub trait EventManager: Send + Sync + 'static {
    /// Inbound event view.
    type Event: InboundEvent;
    /// Reply slot for events that expect an answer.
    type Reply: ReplySlot;
    /// Token for an event suspended awaiting a later reply.
    type Suspended: Send + 'static;

    /// Register the bridge callback for a `(suite, event)` pair.
    ///
    /// # Errors
    ///
    /// Returns the OS status when registration is rejected.
    fn install_handler(&self, suite: FourCharCode, event: FourCharCode) -> Result<(), OsStatus>;

    /// Suspend the event currently being delivered.
    ///
    /// # Errors
    ///
    /// Returns the OS status when the event cannot be suspended.
    fn suspend(&self, event: &Self::Event) -> Result<Self::Suspended, OsStatus>;

    /// Resume a suspended event, handing its reply back to the sender.
    ///
    /// Consumes both handles; each suspended event is resumed at most once.
    ///
    /// # Errors
    ///
    /// Returns the OS status when resumption fails.
    fn resume(
        &self,
        suspended: Self::Suspended,
        reply: Self::Reply,
        status: OsStatus,
    ) -> Result<(), OsStatus>;
}
