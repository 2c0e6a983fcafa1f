//! Handing decoded events to the host.
//!
//! The bridge calls a [`Dispatcher`] on the OS event thread. A dispatcher
//! must not block: it enqueues and returns. [`channel`] gives the usual
//! setup, a bounded queue drained by the host runtime.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use aebridge_core::EventRecord;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::pending::Completer;

/// One decoded event crossing into the host.
#[derive(Debug)]
pub struct Dispatch {
    record: EventRecord,
    completer: Option<Completer>,
}

impl Dispatch {
    /// An event whose sender does not wait for a reply.
    #[must_use]
    pub fn notify(record: EventRecord) -> Self {
        Self {
            record,
            completer: None,
        }
    }

    /// An event whose sender waits for `completer` to be called.
    #[must_use]
    pub fn request(record: EventRecord, completer: Completer) -> Self {
        Self {
            record,
            completer: Some(completer),
        }
    }

    /// The decoded event.
    #[must_use]
    pub fn record(&self) -> &EventRecord {
        &self.record
    }

    /// Whether the sender waits for a reply.
    #[must_use]
    pub fn expects_reply(&self) -> bool {
        self.completer.is_some()
    }

    /// Split into the record and the completer, if any.
    #[must_use]
    pub fn into_parts(self) -> (EventRecord, Option<Completer>) {
        (self.record, self.completer)
    }
}

/// Why a dispatch was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The host queue is at capacity.
    #[error("dispatch queue is full")]
    QueueFull,
    /// The host stopped receiving.
    #[error("dispatch queue is closed")]
    Closed,
    /// The dispatcher refused for its own reason.
    #[error("{0}")]
    Rejected(String),
}

/// A refused dispatch, handed back so its completer can be failed.
#[derive(Debug)]
pub struct DispatchRejected {
    /// The dispatch that was not delivered.
    pub dispatch: Dispatch,
    /// Why.
    pub error: DispatchError,
}

impl DispatchRejected {
    /// Wrap a refused dispatch.
    #[must_use]
    pub fn new(dispatch: Dispatch, error: DispatchError) -> Self {
        Self { dispatch, error }
    }
}

impl fmt::Display for DispatchRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for DispatchRejected {}

/// Receives decoded events on the OS event thread.
pub trait Dispatcher: Send + Sync + 'static {
    /// Hand one event to the host without blocking.
    ///
    /// # Errors
    ///
    /// Returns the dispatch when it could not be delivered.
    fn dispatch(&self, dispatch: Dispatch) -> Result<(), DispatchRejected>;
}

impl<F> Dispatcher for F
where
    F: Fn(Dispatch) -> Result<(), DispatchRejected> + Send + Sync + 'static,
{
    fn dispatch(&self, dispatch: Dispatch) -> Result<(), DispatchRejected> {
        self(dispatch)
    }
}

/// The process-wide dispatcher. Setting it again replaces the previous one.
#[derive(Default)]
pub(crate) struct DispatcherSlot {
    current: RwLock<Option<Arc<dyn Dispatcher>>>,
}

impl DispatcherSlot {
    pub(crate) fn set(&self, dispatcher: Arc<dyn Dispatcher>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(dispatcher);
    }

    pub(crate) fn current(&self) -> Option<Arc<dyn Dispatcher>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for DispatcherSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherSlot")
            .field("installed", &self.current().is_some())
            .finish()
    }
}

/// Dispatcher feeding a bounded [`DispatchQueue`].
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::Sender<Dispatch>,
}

impl Dispatcher for ChannelDispatcher {
    fn dispatch(&self, dispatch: Dispatch) -> Result<(), DispatchRejected> {
        self.tx.try_send(dispatch).map_err(|err| match err {
            TrySendError::Full(dispatch) => DispatchRejected::new(dispatch, DispatchError::QueueFull),
            TrySendError::Closed(dispatch) => DispatchRejected::new(dispatch, DispatchError::Closed),
        })
    }
}

/// Host side of [`channel`].
#[derive(Debug)]
pub struct DispatchQueue {
    rx: mpsc::Receiver<Dispatch>,
}

impl DispatchQueue {
    /// Wait for the next event. `None` once every dispatcher is gone.
    pub async fn recv(&mut self) -> Option<Dispatch> {
        self.rx.recv().await
    }

    /// Take the next event without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TryRecvError::Empty`] when nothing is queued and
    /// [`TryRecvError::Disconnected`] once every dispatcher is gone.
    pub fn try_recv(&mut self) -> Result<Dispatch, TryRecvError> {
        self.rx.try_recv()
    }

    /// Stop accepting events. Queued events can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// A bounded dispatch queue. A capacity of zero is raised to one.
#[must_use]
pub fn channel(capacity: usize) -> (ChannelDispatcher, DispatchQueue) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelDispatcher { tx }, DispatchQueue { rx })
}
