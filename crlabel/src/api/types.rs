//! Messages exchanged with the API worker thread.
//!
//! Every request carries the session `OpId` it was issued under; the response
//! echoes it so the session can drop answers to superseded requests.

use crlabel_core::error::ApiResult;
use crlabel_core::session::{Event, OpId};
use crlabel_core::types::{Label, SessionInfo, Target};

/// Commands sent from the main thread to the API worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    FetchTarget(OpId),
    FetchInfo(OpId),
    SubmitLabel { op: OpId, label: Label },
}

/// Outcome of one [`ApiRequest`], carried inside `AppEvent::Api`.
#[derive(Debug)]
pub enum ApiResponse {
    Target { op: OpId, result: ApiResult<Target> },
    Info { op: OpId, result: ApiResult<SessionInfo> },
    Submitted { op: OpId, result: ApiResult<()> },
}

impl ApiResponse {
    /// The session event this response stands for.
    pub fn into_event(self) -> Event {
        match self {
            ApiResponse::Target { op, result: Ok(target) } => Event::TargetLoaded { op, target },
            ApiResponse::Target { op, result: Err(e) } => {
                Event::TargetFailed { op, transient: e.is_transient(), error: e.to_string() }
            }
            ApiResponse::Info { op, result: Ok(info) } => Event::InfoLoaded { op, info },
            ApiResponse::Info { op, result: Err(e) } => Event::InfoFailed { op, error: e.to_string() },
            ApiResponse::Submitted { op, result: Ok(()) } => Event::SubmissionSucceeded { op },
            ApiResponse::Submitted { op, result: Err(e) } => {
                Event::SubmissionFailed { op, error: e.to_string() }
            }
        }
    }
}
