//! Minimum-dwell gate sized to the text under review.
//!
//! [`ReadingLock`] is the pure half: it tracks locked/unlocked and hands out a
//! [`LockTicket`] every time the watched text changes. [`LockTimer`] is the
//! tokio half: it holds at most one pending sleep and reports the ticket's
//! generation back when it elapses. A release for any generation other than
//! the most recent one is ignored, so a superseded timer can never unlock.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tokio::task::AbortHandle;
use tracing::trace;

/// ASCII word characters, matching `\w` in the browser client.
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?-u:\w)+").expect("static regex"));

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 500;
pub const DEFAULT_MIN_LOCK: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockConfig {
    /// Assumed reading rate `R`. Must be non-zero.
    pub words_per_minute: u32,
    /// Floor `Lmin` applied to every computed duration.
    pub min_lock: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            min_lock: DEFAULT_MIN_LOCK,
        }
    }
}

/// Number of maximal runs of word characters. Absent text has zero words.
pub fn word_count(text: Option<&str>) -> usize {
    text.map_or(0, |t| WORD.find_iter(t).count())
}

/// `max(words / R * 60s, Lmin)`, exact to the nanosecond.
pub fn lock_duration(text: Option<&str>, config: &LockConfig) -> Duration {
    let words = word_count(text) as u128;
    let rate = u128::from(config.words_per_minute.max(1));
    let nanos = words * 60_000_000_000 / rate;
    let reading = Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX));
    reading.max(config.min_lock)
}

/// Identifies one arming of the lock. Strictly increasing per [`ReadingLock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LockGeneration(pub u64);

/// Instruction to start a timer: unlock `generation` after `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTicket {
    pub generation: LockGeneration,
    pub duration: Duration,
}

/// Locked/unlocked state of the reading gate.
///
/// Starts locked. Every [`watch`](Self::watch) re-locks and supersedes the
/// previous ticket; only the latest ticket's [`expire`](Self::expire) unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingLock {
    config: LockConfig,
    generation: u64,
    locked: bool,
    pending: Option<LockTicket>,
}

impl ReadingLock {
    pub fn new(config: LockConfig) -> Self {
        Self {
            config,
            generation: 0,
            locked: true,
            pending: None,
        }
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The ticket whose expiry would currently unlock, if any.
    pub fn pending(&self) -> Option<LockTicket> {
        self.pending
    }

    /// The watched text changed: lock and issue a fresh ticket.
    pub fn watch(&mut self, text: Option<&str>) -> LockTicket {
        self.generation += 1;
        let ticket = LockTicket {
            generation: LockGeneration(self.generation),
            duration: lock_duration(text, &self.config),
        };
        self.locked = true;
        self.pending = Some(ticket);
        trace!(generation = self.generation, duration_ms = ticket.duration.as_millis() as u64, "lock armed");
        ticket
    }

    /// Lock with nothing to read. Invalidates any outstanding ticket.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.locked = true;
        self.pending = None;
    }

    /// A timer for `generation` elapsed. Returns `true` if that unlocked the gate.
    pub fn expire(&mut self, generation: LockGeneration) -> bool {
        match self.pending {
            Some(ticket) if ticket.generation == generation => {
                self.pending = None;
                self.locked = false;
                true
            }
            _ => false,
        }
    }
}

impl Default for ReadingLock {
    fn default() -> Self {
        Self::new(LockConfig::default())
    }
}

/// Owns the single pending lock timeout.
///
/// Arming cancels whatever was pending first; dropping the timer cancels it
/// too, so no timeout outlives its owner.
#[derive(Debug, Default)]
pub struct LockTimer {
    handle: Option<AbortHandle>,
}

impl LockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `on_release(ticket.generation)` after `ticket.duration`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, ticket: LockTicket, on_release: F)
    where
        F: FnOnce(LockGeneration) + Send + 'static,
    {
        self.cancel();
        let task = tokio::spawn(async move {
            tokio::time::sleep(ticket.duration).await;
            on_release(ticket.generation);
        });
        self.handle = Some(task.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for LockTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
