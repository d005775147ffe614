//! Session state and the queries the presentation layer makes against it.

use std::sync::Arc;
use std::time::Duration;

use crate::reading_lock::{LockConfig, ReadingLock};
use crate::types::{Label, SessionInfo, Target};

/// Sequence number of one backend request, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub lock: LockConfig,
    /// Automatic re-fetches after a failed target request. `0` stalls on the
    /// first failure until the user retries.
    pub fetch_retries: u32,
    /// Delay before the first automatic re-fetch; doubles per attempt.
    pub retry_backoff: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lock: LockConfig::default(),
            fetch_retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Where the acquire → read → label → advance cycle currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No current target. `pending` is the outstanding fetch; `None` means the
    /// last fetch failed (or the session has not started) and nothing is in
    /// flight.
    Acquiring { pending: Option<OpId>, attempt: u32 },
    /// Target shown, reading lock engaged. Only SKIP is accepted.
    AwaitingRead,
    /// Target shown, lock released. Every label is accepted.
    Ready,
    /// A label submission is in flight. Nothing is accepted.
    Submitting { op: OpId, label: Label },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Acquiring { .. } => "acquiring",
            Phase::AwaitingRead => "awaiting_read",
            Phase::Ready => "ready",
            Phase::Submitting { .. } => "submitting",
        }
    }
}

/// What the label bar needs to decide which buttons are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelGate {
    pub locked: bool,
    pub has_target: bool,
    pub submitting: bool,
}

impl LabelGate {
    /// SKIP needs only a target; everything else also needs the lock released.
    pub fn allows(&self, label: Label) -> bool {
        if self.submitting || !self.has_target {
            return false;
        }
        !label.requires_unlock() || !self.locked
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) config: SessionConfig,
    pub(crate) phase: Phase,
    pub(crate) started: bool,
    pub(crate) target: Option<Arc<Target>>,
    pub(crate) lock: ReadingLock,
    pub(crate) info: SessionInfo,
    pub(crate) submission_count: u64,
    pub(crate) last_error: Option<String>,
    pub(crate) next_op: u64,
    /// Outstanding info request, if any.
    pub(crate) info_pending: Option<OpId>,
    /// Identifier the most recent info request was issued for.
    pub(crate) info_key: Option<Option<String>>,
    /// The identifier changed while an info request was in flight.
    pub(crate) info_dirty: bool,
}

impl SessionState {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            lock: ReadingLock::new(config.lock),
            config,
            phase: Phase::Acquiring { pending: None, attempt: 0 },
            started: false,
            target: None,
            info: SessionInfo::default(),
            submission_count: 0,
            last_error: None,
            next_op: 0,
            info_pending: None,
            info_key: None,
            info_dirty: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn reading_lock(&self) -> &ReadingLock {
        &self.lock
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Successful submissions so far. Used as a sequence number, never shown.
    pub fn submission_count(&self) -> u64 {
        self.submission_count
    }

    /// Message of the most recent failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// `true` when a target fetch failed and nothing is in flight.
    pub fn is_stalled(&self) -> bool {
        self.started && matches!(self.phase, Phase::Acquiring { pending: None, .. })
    }

    pub fn gate(&self) -> LabelGate {
        LabelGate {
            locked: self.lock.is_locked(),
            has_target: self.target.is_some(),
            submitting: matches!(self.phase, Phase::Submitting { .. }),
        }
    }

    pub fn can_submit(&self, label: Label) -> bool {
        matches!(self.phase, Phase::AwaitingRead | Phase::Ready) && self.gate().allows(label)
    }

    pub(crate) fn next_op(&mut self) -> OpId {
        self.next_op += 1;
        OpId(self.next_op)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
