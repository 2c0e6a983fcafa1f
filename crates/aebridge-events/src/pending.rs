//! Suspended events awaiting a reply.
//!
//! A [`PendingReply`] owns the OS handles of one suspended event and resumes
//! it exactly once: either through [`PendingReply::resume`] or, if it is
//! dropped first, with a failure outcome. The [`Completer`] handed to the
//! host is a type-erased wrapper over the same guarantee. It can be moved
//! across threads and tasks, and whichever of completion, timeout or drop
//! happens first resumes the event.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use aebridge_core::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::backend::EventManager;
use crate::reply::ReplyOutcome;
use crate::status::OsStatus;

/// Error text sent when a pending reply is dropped unanswered.
pub const DROPPED_REPLY_MESSAGE: &str = "event was dropped without a reply";

/// The OS handles of one suspended event.
pub struct PendingReply<M: EventManager> {
    manager: Arc<M>,
    handles: Option<(M::Suspended, M::Reply)>,
    label: String,
}

impl<M: EventManager> PendingReply<M> {
    pub(crate) fn new(
        manager: Arc<M>,
        suspended: M::Suspended,
        reply: M::Reply,
        label: String,
    ) -> Self {
        Self {
            manager,
            handles: Some((suspended, reply)),
            label,
        }
    }

    /// `suite/event` of the suspended event, for logs.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Write `outcome` into the reply and resume the event.
    ///
    /// # Errors
    ///
    /// Returns the OS status when resumption fails. The handles are released
    /// either way.
    pub fn resume(mut self, outcome: ReplyOutcome) -> Result<(), OsStatus> {
        self.release(&outcome)
    }

    fn release(&mut self, outcome: &ReplyOutcome) -> Result<(), OsStatus> {
        let Some((suspended, mut reply)) = self.handles.take() else {
            return Ok(());
        };
        let status = outcome.write_to(&mut reply);
        match self.manager.resume(suspended, reply, status) {
            Ok(()) => {
                debug!(event = %self.label, %status, "Resumed suspended event");
                Ok(())
            },
            Err(err) => {
                error!(event = %self.label, status = %err, "Failed to resume suspended event");
                Err(err)
            },
        }
    }
}

impl<M: EventManager> Drop for PendingReply<M> {
    fn drop(&mut self) {
        if self.handles.is_some() {
            warn!(event = %self.label, "Pending reply dropped, answering with failure");
            let _ = self.release(&ReplyOutcome::Error(DROPPED_REPLY_MESSAGE.to_string()));
        }
    }
}

impl<M: EventManager> fmt::Debug for PendingReply<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingReply")
            .field("label", &self.label)
            .field("resumed", &self.handles.is_none())
            .finish_non_exhaustive()
    }
}

/// Backend-independent view of a [`ReplyCell`].
trait Resolve: Send + Sync {
    /// Resume with `outcome` unless already resumed. Returns whether this
    /// call did the resuming.
    fn resolve(&self, outcome: ReplyOutcome) -> bool;
}

/// Shared slot a pending reply is taken out of exactly once.
struct ReplyCell<M: EventManager> {
    pending: Mutex<Option<PendingReply<M>>>,
}

impl<M: EventManager> Resolve for ReplyCell<M> {
    fn resolve(&self, outcome: ReplyOutcome) -> bool {
        let taken = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            Some(pending) => {
                let _ = pending.resume(outcome);
                true
            },
            None => false,
        }
    }
}

/// Aborts the timeout task once the completer is gone.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Single-use completion handle for an event that expects a reply.
///
/// Consumed by [`complete`](Self::complete) and its shorthands, so a handler
/// cannot answer twice. Dropping it unanswered resumes the event with a
/// failure carrying [`DROPPED_REPLY_MESSAGE`].
pub struct Completer {
    cell: Option<Arc<dyn Resolve>>,
    label: String,
    timer: Option<AbortOnDrop>,
}

impl Completer {
    pub(crate) fn new<M: EventManager>(pending: PendingReply<M>) -> Self {
        let label = pending.label().to_string();
        let cell: Arc<dyn Resolve> = Arc::new(ReplyCell {
            pending: Mutex::new(Some(pending)),
        });
        Self {
            cell: Some(cell),
            label,
            timer: None,
        }
    }

    /// Force a failure reply if nothing completes within `after`.
    pub(crate) fn arm_timeout(&mut self, runtime: &Handle, after: Duration) {
        let Some(cell) = &self.cell else {
            return;
        };
        let weak: Weak<dyn Resolve> = Arc::downgrade(cell);
        let label = self.label.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(after).await;
            let Some(cell) = weak.upgrade() else {
                return;
            };
            let message = format!("handler timed out after {}s", after.as_secs());
            if cell.resolve(ReplyOutcome::Error(message)) {
                warn!(event = %label, timeout_secs = after.as_secs(), "Reply timed out");
            }
        });
        self.timer = Some(AbortOnDrop(task));
    }

    /// `suite/event` of the event being answered.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Answer the event from an `(error, result)` pair.
    ///
    /// An error is written to the reply's error-string slot and the event
    /// fails; otherwise the result, if any, becomes the direct parameter.
    /// Returns `false` when the event had already been answered by a timeout.
    pub fn complete(self, error: Option<String>, result: Option<Value>) -> bool {
        self.resolve(ReplyOutcome::from_parts(error, result))
    }

    /// Answer with a value.
    pub fn reply(self, value: impl Into<Value>) -> bool {
        self.resolve(ReplyOutcome::Value(value.into()))
    }

    /// Answer with an error message.
    pub fn fail(self, message: impl Into<String>) -> bool {
        self.resolve(ReplyOutcome::Error(message.into()))
    }

    /// Answer without writing anything into the reply.
    pub fn finish(self) -> bool {
        self.resolve(ReplyOutcome::Empty)
    }

    fn resolve(mut self, outcome: ReplyOutcome) -> bool {
        let resolved = self
            .cell
            .take()
            .is_some_and(|cell| cell.resolve(outcome));
        if !resolved {
            debug!(event = %self.label, "Reply already sent, ignoring completion");
        }
        resolved
    }
}

impl Drop for Completer {
    fn drop(&mut self) {
        if let Some(cell) = self.cell.take()
            && cell.resolve(ReplyOutcome::Error(DROPPED_REPLY_MESSAGE.to_string()))
        {
            warn!(event = %self.label, "Completer dropped without a reply");
        }
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("label", &self.label)
            .field("timeout_armed", &self.timer.is_some())
            .finish_non_exhaustive()
    }
}
