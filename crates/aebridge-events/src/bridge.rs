//! The per-event controller.
//!
//! [`EventBridge::handle_event`] is what the OS callback runs. It extracts
//! the record, decides whether the sender waits for a reply, and either
//! fires the event at the dispatcher or suspends it and hands the host a
//! [`Completer`].

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use aebridge_core::FourCharCode;
use aebridge_descriptor::Decoder;
use tokio::runtime::Handle;
use tracing::{debug, debug_span, info, trace, warn};

use crate::backend::EventManager;
use crate::dispatcher::{Dispatch, Dispatcher, DispatcherSlot};
use crate::error::{BridgeError, BridgeResult};
use crate::extractor::EventExtractor;
use crate::pending::{Completer, PendingReply};
use crate::status::OsStatus;

/// What the OS callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    /// The event was fully handled inside the callback.
    Handled,
    /// The event was suspended; its reply comes later through the
    /// completer.
    ReplyLater,
    /// The event was answered immediately with this failure.
    Failed(OsStatus),
}

impl CallbackStatus {
    /// The status code returned from the OS handler.
    ///
    /// A suspended event returns `noErr`; the OS ignores the handler's
    /// reply until the event is resumed.
    #[must_use]
    pub fn os_status(self) -> OsStatus {
        match self {
            Self::Handled | Self::ReplyLater => OsStatus::NO_ERR,
            Self::Failed(status) => status,
        }
    }
}

/// Tunables for [`EventBridge`].
#[derive(Debug, Clone, Default)]
pub struct BridgeOptions {
    /// Decoder used for parameters.
    pub decoder: Decoder,
    /// Parameter codes decoded in addition to the well-known set.
    pub extra_parameters: Vec<FourCharCode>,
    /// Force a failure reply when a handler takes longer than this.
    pub reply_timeout: Option<Duration>,
}

/// Receives Apple Events from an [`EventManager`] and forwards them to the
/// installed [`Dispatcher`].
pub struct EventBridge<M: EventManager> {
    manager: Arc<M>,
    extractor: EventExtractor,
    dispatcher: DispatcherSlot,
    installed: Mutex<HashSet<(FourCharCode, FourCharCode)>>,
    reply_timeout: Option<Duration>,
    runtime: Option<Handle>,
}

impl<M: EventManager> EventBridge<M> {
    /// A bridge with default options.
    #[must_use]
    pub fn new(manager: M) -> Self {
        Self::with_options(manager, BridgeOptions::default())
    }

    /// A bridge with explicit options.
    #[must_use]
    pub fn with_options(manager: M, options: BridgeOptions) -> Self {
        let extractor = EventExtractor::new()
            .with_decoder(options.decoder)
            .with_extra_parameters(options.extra_parameters);
        Self {
            manager: Arc::new(manager),
            extractor,
            dispatcher: DispatcherSlot::default(),
            installed: Mutex::new(HashSet::new()),
            reply_timeout: options.reply_timeout.filter(|t| !t.is_zero()),
            runtime: None,
        }
    }

    /// Runtime used for reply timeouts.
    ///
    /// The OS event thread is not a Tokio thread, so a bridge with a
    /// timeout needs a handle to spawn its timers on. Without one the
    /// ambient runtime is used when there is one.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// The underlying event manager.
    #[must_use]
    pub fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    /// The extractor building records for this bridge.
    #[must_use]
    pub fn extractor(&self) -> &EventExtractor {
        &self.extractor
    }

    /// Install the process-wide dispatcher, replacing any previous one.
    pub fn set_dispatcher<D: Dispatcher>(&self, dispatcher: D) {
        self.dispatcher.set(Arc::new(dispatcher));
        debug!("Dispatcher installed");
    }

    /// Whether a dispatcher is installed.
    #[must_use]
    pub fn has_dispatcher(&self) -> bool {
        self.dispatcher.current().is_some()
    }

    /// Register the bridge for `(suite, event)`.
    ///
    /// Returns `Ok(true)` when the OS registration was made and `Ok(false)`
    /// when the pair was already installed.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InstallFailed`] when the OS rejects the
    /// registration. Nothing is recorded in that case, so a later call
    /// retries.
    pub fn install_handler(&self, suite: FourCharCode, event: FourCharCode) -> BridgeResult<bool> {
        let mut installed = self.installed.lock().unwrap_or_else(PoisonError::into_inner);
        if installed.contains(&(suite, event)) {
            trace!(%suite, %event, "Handler already installed");
            return Ok(false);
        }

        self.manager.install_handler(suite, event).map_err(|status| {
            warn!(%suite, %event, %status, "Handler installation rejected");
            BridgeError::InstallFailed {
                suite,
                event,
                status,
            }
        })?;

        installed.insert((suite, event));
        info!(%suite, %event, "Installed Apple Event handler");
        Ok(true)
    }

    /// [`install_handler`](Self::install_handler) from string codes.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidCode`] for a malformed code, otherwise
    /// as [`install_handler`](Self::install_handler).
    pub fn install_handler_str(&self, suite: &str, event: &str) -> BridgeResult<bool> {
        self.install_handler(suite.parse()?, event.parse()?)
    }

    /// Whether `(suite, event)` is installed.
    #[must_use]
    pub fn is_installed(&self, suite: FourCharCode, event: FourCharCode) -> bool {
        self.installed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(suite, event))
    }

    /// Every installed pair, sorted.
    #[must_use]
    pub fn installed_handlers(&self) -> BTreeSet<(FourCharCode, FourCharCode)> {
        self.installed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    /// Process one inbound event.
    ///
    /// `reply` is the OS reply slot; `None` means the sender does not wait.
    /// Never panics and never blocks on the host.
    pub fn handle_event(&self, event: &M::Event, reply: Option<M::Reply>) -> CallbackStatus {
        let record = self.extractor.extract(event);
        let span = debug_span!(
            "apple_event",
            suite = record.suite(),
            event = record.event(),
            transaction_id = record.transaction_id(),
        );
        let _guard = span.enter();
        debug!(expects_reply = reply.is_some(), "Received Apple Event");

        let dispatcher = self.dispatcher.current();

        let Some(reply) = reply else {
            match dispatcher {
                Some(dispatcher) => {
                    if let Err(rejected) = dispatcher.dispatch(Dispatch::notify(record)) {
                        warn!(error = %rejected, "Dropped event, dispatch failed");
                    } else {
                        trace!("Dispatched event");
                    }
                },
                None => debug!("No dispatcher installed, acknowledging event"),
            }
            return CallbackStatus::Handled;
        };

        let Some(dispatcher) = dispatcher else {
            warn!("No dispatcher installed, event not handled");
            return CallbackStatus::Failed(OsStatus::EVENT_NOT_HANDLED);
        };

        let suspended = match self.manager.suspend(event) {
            Ok(suspended) => suspended,
            Err(status) => {
                warn!(%status, "Failed to suspend event");
                return CallbackStatus::Failed(OsStatus::EVENT_FAILED);
            },
        };
        debug!("Suspended event");

        let label = format!("{}/{}", record.suite(), record.event());
        let pending = PendingReply::new(Arc::clone(&self.manager), suspended, reply, label);
        let mut completer = Completer::new(pending);
        self.arm_timeout(&mut completer);

        match dispatcher.dispatch(Dispatch::request(record, completer)) {
            Ok(()) => trace!("Dispatched event"),
            Err(rejected) => {
                warn!(error = %rejected.error, "Dispatch failed, answering with failure");
                let message = format!("event could not be dispatched: {}", rejected.error);
                if let (_, Some(completer)) = rejected.dispatch.into_parts() {
                    completer.fail(message);
                }
            },
        }
        CallbackStatus::ReplyLater
    }

    fn arm_timeout(&self, completer: &mut Completer) {
        let Some(after) = self.reply_timeout else {
            return;
        };
        match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => completer.arm_timeout(&runtime, after),
            None => warn!("No runtime for reply timeout, waiting indefinitely"),
        }
    }
}

impl<M: EventManager> std::fmt::Debug for EventBridge<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("installed", &self.installed_handlers())
            .field("dispatcher", &self.dispatcher)
            .field("reply_timeout", &self.reply_timeout)
            .finish_non_exhaustive()
    }
}
