//! Effects (side effects as data).
//!
//! The transition function never talks to the backend or touches a clock; it
//! returns these and the host interprets them. Every request effect carries the
//! `OpId` its completion event must echo back.

use std::time::Duration;

use crate::reading_lock::LockTicket;
use crate::types::Label;

use super::state::OpId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call `fetch_current_target`, optionally after a backoff delay.
    FetchTarget { op: OpId, delay: Option<Duration> },
    /// Call `fetch_session_info`.
    FetchInfo { op: OpId },
    /// Replace any pending lock timeout with this one.
    ArmLock(LockTicket),
    /// Drop the pending lock timeout, if any.
    CancelLock,
    /// Call `submit_label`. `target_id` is informational; it is not sent.
    SubmitLabel {
        op: OpId,
        label: Label,
        target_id: Option<String>,
    },
}
