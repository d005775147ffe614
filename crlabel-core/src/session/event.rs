//! Inputs to the session state machine.
//!
//! Completion events carry the [`OpId`] of the request they answer (or the
//! lock generation they release) so the transition function can discard
//! results that arrive after the session has moved on.

use crate::reading_lock::LockGeneration;
use crate::types::{Label, SessionInfo, Target};

use super::state::OpId;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The session is mounted. Issues the first target and info requests.
    Start,
    /// `fetch_current_target` succeeded.
    TargetLoaded { op: OpId, target: Target },
    /// `fetch_current_target` failed. `transient` failures may be retried
    /// automatically; the rest wait for an explicit `Retry`.
    TargetFailed { op: OpId, error: String, transient: bool },
    /// The user asked to re-issue a failed target fetch.
    Retry,
    /// The reading-lock timer for `generation` elapsed.
    LockReleased { generation: LockGeneration },
    /// The user picked a label.
    LabelClicked(Label),
    SubmissionSucceeded { op: OpId },
    SubmissionFailed { op: OpId, error: String },
    InfoLoaded { op: OpId, info: SessionInfo },
    InfoFailed { op: OpId, error: String },
}

impl Event {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::TargetLoaded { .. } => "target_loaded",
            Event::TargetFailed { .. } => "target_failed",
            Event::Retry => "retry",
            Event::LockReleased { .. } => "lock_released",
            Event::LabelClicked(_) => "label_clicked",
            Event::SubmissionSucceeded { .. } => "submission_succeeded",
            Event::SubmissionFailed { .. } => "submission_failed",
            Event::InfoLoaded { .. } => "info_loaded",
            Event::InfoFailed { .. } => "info_failed",
        }
    }
}
