//! Pure state transition function.
//!
//! Takes the current state and an event and returns the new state plus the
//! effects to run. No I/O, no clocks. Events that do not apply to the current
//! phase, including completions for superseded requests, leave the state
//! untouched and produce no effects.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::effect::Effect;
use super::event::Event;
use super::state::{OpId, Phase, SessionState};

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub state: SessionState,
    /// Effects to execute, in order.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    pub fn no_change(state: SessionState) -> Self {
        Self { state, effects: vec![] }
    }
}

pub fn transition(mut state: SessionState, event: Event) -> TransitionResult {
    let mut effects = Vec::new();
    let kind = event.kind();

    match (state.phase.clone(), event) {
        // =====================================================================
        // Acquiring
        // =====================================================================
        (Phase::Acquiring { .. }, Event::Start) if !state.started => {
            state.started = true;
            begin_acquire(&mut state, &mut effects);
        }

        (Phase::Acquiring { pending: Some(expected), .. }, Event::TargetLoaded { op, target })
            if op == expected =>
        {
            let ticket = state.lock.watch(Some(&target.comment_body));
            state.target = Some(Arc::new(target));
            state.phase = Phase::AwaitingRead;
            state.last_error = None;
            effects.push(Effect::ArmLock(ticket));
            refresh_info(&mut state, &mut effects);
        }

        (Phase::Acquiring { pending: Some(expected), attempt }, Event::TargetFailed { op, error, transient })
            if op == expected =>
        {
            state.last_error = Some(error);
            if transient && attempt < state.config.fetch_retries {
                let op = state.next_op();
                let delay = backoff(state.config.retry_backoff, attempt);
                state.phase = Phase::Acquiring { pending: Some(op), attempt: attempt + 1 };
                effects.push(Effect::FetchTarget { op, delay: Some(delay) });
            } else {
                state.phase = Phase::Acquiring { pending: None, attempt };
            }
        }

        (Phase::Acquiring { pending: None, .. }, Event::Retry) if state.started => {
            let op = state.next_op();
            state.phase = Phase::Acquiring { pending: Some(op), attempt: 0 };
            effects.push(Effect::FetchTarget { op, delay: None });
        }

        // =====================================================================
        // Reading lock
        // =====================================================================
        (Phase::AwaitingRead, Event::LockReleased { generation }) => {
            if state.lock.expire(generation) {
                state.phase = Phase::Ready;
            }
        }

        // The lock keeps running while a SKIP is in flight; a failed
        // submission then resumes in whichever phase the lock now implies.
        (Phase::Submitting { .. }, Event::LockReleased { generation }) => {
            state.lock.expire(generation);
        }

        // =====================================================================
        // Labeling
        // =====================================================================
        (Phase::AwaitingRead | Phase::Ready, Event::LabelClicked(label)) if state.can_submit(label) => {
            let op = state.next_op();
            let target_id = state.target.as_ref().and_then(|t| t.identifier.clone());
            state.phase = Phase::Submitting { op, label };
            effects.push(Effect::SubmitLabel { op, label, target_id });
        }

        (Phase::Submitting { op: expected, .. }, Event::SubmissionSucceeded { op }) if op == expected => {
            state.submission_count += 1;
            state.last_error = None;
            begin_acquire(&mut state, &mut effects);
        }

        (Phase::Submitting { op: expected, .. }, Event::SubmissionFailed { op, error })
            if op == expected =>
        {
            state.last_error = Some(error);
            state.phase = if state.lock.is_locked() { Phase::AwaitingRead } else { Phase::Ready };
        }

        // =====================================================================
        // Session info (independent of the phase)
        // =====================================================================
        (_, Event::InfoLoaded { op, info }) if state.info_pending == Some(op) => {
            state.info = info;
            state.info_pending = None;
            if state.info_dirty {
                refresh_info(&mut state, &mut effects);
            }
        }

        (_, Event::InfoFailed { op, .. }) if state.info_pending == Some(op) => {
            state.info_pending = None;
            if state.info_dirty {
                refresh_info(&mut state, &mut effects);
            }
        }

        (phase, _) => {
            debug!(event = kind, phase = phase.name(), "event ignored");
            return TransitionResult::no_change(state);
        }
    }

    debug!(event = kind, phase = state.phase.name(), effects = effects.len(), "transition");
    TransitionResult::new(state, effects)
}

/// Clear the current target and request a new one.
fn begin_acquire(state: &mut SessionState, effects: &mut Vec<Effect>) {
    state.target = None;
    state.lock.clear();
    effects.push(Effect::CancelLock);

    let op = state.next_op();
    state.phase = Phase::Acquiring { pending: Some(op), attempt: 0 };
    effects.push(Effect::FetchTarget { op, delay: None });

    refresh_info(state, effects);
}

/// Request session info if the current identifier differs from the one the
/// last request was issued for. At most one info request is in flight; a
/// change seen meanwhile is picked up when that request completes.
fn refresh_info(state: &mut SessionState, effects: &mut Vec<Effect>) {
    let key = state.target.as_ref().and_then(|t| t.identifier.clone());
    if state.info_key.as_ref() == Some(&key) && !state.info_dirty {
        return;
    }
    if state.info_pending.is_some() {
        state.info_dirty = true;
        return;
    }
    let op: OpId = state.next_op();
    state.info_key = Some(key);
    state.info_pending = Some(op);
    state.info_dirty = false;
    effects.push(Effect::FetchInfo { op });
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}
