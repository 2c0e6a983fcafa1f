//! Mock event manager and reply slot.
//!
//! Available in this crate's tests and, with the `test-support` feature, to
//! downstream crates.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use aebridge_core::FourCharCode;
use tokio::sync::watch;

use crate::backend::{EventManager, ReplySlot};
use crate::memory::MemoryEvent;
use crate::reply::ReplyValue;
use crate::status::OsStatus;

/// Reply slot that records what was written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockReply {
    parameters: HashMap<FourCharCode, ReplyValue>,
    reject_with: Option<OsStatus>,
}

impl MockReply {
    /// An empty reply slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A reply slot rejecting every write with `status`.
    #[must_use]
    pub fn rejecting(status: OsStatus) -> Self {
        Self {
            reject_with: Some(status),
            ..Self::default()
        }
    }

    /// The value written under `keyword`.
    #[must_use]
    pub fn parameter(&self, keyword: FourCharCode) -> Option<&ReplyValue> {
        self.parameters.get(&keyword)
    }

    /// Whether anything was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl ReplySlot for MockReply {
    fn put_parameter(&mut self, keyword: FourCharCode, value: &ReplyValue) -> Result<(), OsStatus> {
        if let Some(status) = self.reject_with {
            return Err(status);
        }
        self.parameters.insert(keyword, value.clone());
        Ok(())
    }
}

/// Suspension token handed out by [`MockEventManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockToken(pub u64);

/// One recorded resume call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeRecord {
    /// Which suspension was resumed.
    pub token: MockToken,
    /// The reply as written.
    pub reply: MockReply,
    /// The status passed to the OS.
    pub status: OsStatus,
}

#[derive(Debug, Default)]
struct State {
    installs: Vec<(FourCharCode, FourCharCode)>,
    install_attempts: usize,
    suspends: Vec<MockToken>,
    resumes: Vec<ResumeRecord>,
    resume_attempts: usize,
    install_error: Option<OsStatus>,
    suspend_error: Option<OsStatus>,
    resume_error: Option<OsStatus>,
}

/// In-memory [`EventManager`] recording every call.
#[derive(Debug)]
pub struct MockEventManager {
    state: Mutex<State>,
    next_token: AtomicU64,
    resumed: watch::Sender<usize>,
}

impl Default for MockEventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEventManager {
    /// A manager accepting every call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            next_token: AtomicU64::new(1),
            resumed: watch::Sender::new(0),
        }
    }

    /// Reject subsequent installs with `status`.
    pub fn fail_install(&self, status: OsStatus) {
        self.state().install_error = Some(status);
    }

    /// Reject subsequent suspensions with `status`.
    pub fn fail_suspend(&self, status: OsStatus) {
        self.state().suspend_error = Some(status);
    }

    /// Reject subsequent resumes with `status`. The call is still recorded
    /// as an attempt.
    pub fn fail_resume(&self, status: OsStatus) {
        self.state().resume_error = Some(status);
    }

    /// Clear every injected failure.
    pub fn heal(&self) {
        let mut state = self.state();
        state.install_error = None;
        state.suspend_error = None;
        state.resume_error = None;
    }

    /// Successful installs, in order.
    #[must_use]
    pub fn installs(&self) -> Vec<(FourCharCode, FourCharCode)> {
        self.state().installs.clone()
    }

    /// Install calls, including rejected ones.
    #[must_use]
    pub fn install_attempts(&self) -> usize {
        self.state().install_attempts
    }

    /// Tokens handed out by successful suspensions.
    #[must_use]
    pub fn suspends(&self) -> Vec<MockToken> {
        self.state().suspends.clone()
    }

    /// Successful resumes, in order.
    #[must_use]
    pub fn resumes(&self) -> Vec<ResumeRecord> {
        self.state().resumes.clone()
    }

    /// Resume calls, including rejected ones.
    #[must_use]
    pub fn resume_attempts(&self) -> usize {
        self.state().resume_attempts
    }

    /// Wait until at least `count` resume calls were made.
    pub async fn wait_for_resumes(&self, count: usize) {
        let mut rx = self.resumed.subscribe();
        let _ = rx.wait_for(|&seen| seen >= count).await;
    }

    pub(crate) fn next_token(&self) -> MockToken {
        MockToken(self.next_token.fetch_add(1, Ordering::Relaxed))
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("mock state lock poisoned")
    }
}

impl EventManager for MockEventManager {
    type Event = MemoryEvent;
    type Reply = MockReply;
    type Suspended = MockToken;

    fn install_handler(&self, suite: FourCharCode, event: FourCharCode) -> Result<(), OsStatus> {
        let mut state = self.state();
        state.install_attempts = state.install_attempts.saturating_add(1);
        if let Some(status) = state.install_error {
            return Err(status);
        }
        state.installs.push((suite, event));
        Ok(())
    }

    fn suspend(&self, _event: &MemoryEvent) -> Result<MockToken, OsStatus> {
        let token = self.next_token();
        let mut state = self.state();
        if let Some(status) = state.suspend_error {
            return Err(status);
        }
        state.suspends.push(token);
        Ok(token)
    }

    fn resume(&self, token: MockToken, reply: MockReply, status: OsStatus) -> Result<(), OsStatus> {
        let attempts = {
            let mut state = self.state();
            state.resume_attempts = state.resume_attempts.saturating_add(1);
            let attempts = state.resume_attempts;
            if let Some(err) = state.resume_error {
                drop(state);
                self.resumed.send_replace(attempts);
                return Err(err);
            }
            state.resumes.push(ResumeRecord {
                token,
                reply,
                status,
            });
            attempts
        };
        self.resumed.send_replace(attempts);
        Ok(())
    }
}
