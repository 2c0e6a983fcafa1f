//! Mock OS seam and dispatchers.

use std::sync::{Arc, Mutex, PoisonError};

use aebridge_events::{Dispatch, DispatchError, DispatchRejected, Dispatcher};

pub use aebridge_events::MemoryEvent as MockEvent;
pub use aebridge_events::testing::{MockEventManager, MockReply, MockToken, ResumeRecord};

/// Dispatcher keeping every dispatch for later inspection.
///
/// Clones share one buffer: hand one clone to the bridge and inspect
/// through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    received: Arc<Mutex<Vec<Dispatch>>>,
}

impl RecordingDispatcher {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything received so far.
    pub fn take(&self) -> Vec<Dispatch> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of dispatches held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Dispatch>> {
        self.received.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, dispatch: Dispatch) -> Result<(), DispatchRejected> {
        self.lock().push(dispatch);
        Ok(())
    }
}

/// Dispatcher refusing everything with one error.
#[derive(Debug, Clone)]
pub struct RejectingDispatcher(pub DispatchError);

impl Dispatcher for RejectingDispatcher {
    fn dispatch(&self, dispatch: Dispatch) -> Result<(), DispatchRejected> {
        Err(DispatchRejected::new(dispatch, self.0.clone()))
    }
}
