//! End-to-end acquire → read → label → advance cycles.
//!
//! Drives a `Session` against an in-memory `AnnotationApi`, executing effects
//! synchronously the way the terminal host does asynchronously. Lock timers
//! are collected instead of slept on so each test decides when they fire.

use std::cell::RefCell;
use std::collections::VecDeque;

use crlabel_core::client::AnnotationApi;
use crlabel_core::error::{ApiError, ApiResult};
use crlabel_core::reading_lock::LockTicket;
use crlabel_core::session::{Effect, Event, Phase, Session};
use crlabel_core::types::{Label, SessionInfo, Side, Target};

#[derive(Default)]
struct FakeBackend {
    targets: RefCell<VecDeque<ApiResult<Target>>>,
    submissions: RefCell<VecDeque<ApiResult<()>>>,
    submitted: RefCell<Vec<Label>>,
    target_calls: RefCell<u32>,
    info_calls: RefCell<u32>,
}

impl AnnotationApi for FakeBackend {
    fn fetch_current_target(&self) -> ApiResult<Target> {
        *self.target_calls.borrow_mut() += 1;
        self.targets
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no more targets".into())))
    }

    fn fetch_session_info(&self) -> ApiResult<SessionInfo> {
        *self.info_calls.borrow_mut() += 1;
        Ok(SessionInfo {
            annotator_identity: "me@example.org".into(),
            annotated_by_current_count: self.submitted.borrow().len() as u64,
            ..SessionInfo::default()
        })
    }

    fn submit_label(&self, label: Label) -> ApiResult<()> {
        let outcome = self.submissions.borrow_mut().pop_front().unwrap_or(Ok(()));
        if outcome.is_ok() {
            self.submitted.borrow_mut().push(label);
        }
        outcome
    }
}

/// Runs `event` and every follow-up effect to quiescence. Returns the lock
/// tickets that were armed along the way.
fn drive(session: &mut Session, api: &FakeBackend, event: Event) -> Vec<LockTicket> {
    let mut armed = Vec::new();
    let mut queue = VecDeque::from([event]);
    while let Some(event) = queue.pop_front() {
        for effect in session.dispatch(event) {
            match effect {
                Effect::FetchTarget { op, .. } => queue.push_back(match api.fetch_current_target() {
                    Ok(target) => Event::TargetLoaded { op, target },
                    Err(e) => Event::TargetFailed { op, transient: e.is_transient(), error: e.to_string() },
                }),
                Effect::FetchInfo { op } => queue.push_back(match api.fetch_session_info() {
                    Ok(info) => Event::InfoLoaded { op, info },
                    Err(e) => Event::InfoFailed { op, error: e.to_string() },
                }),
                Effect::SubmitLabel { op, label, .. } => queue.push_back(match api.submit_label(label) {
                    Ok(()) => Event::SubmissionSucceeded { op },
                    Err(e) => Event::SubmissionFailed { op, error: e.to_string() },
                }),
                Effect::ArmLock(ticket) => armed.push(ticket),
                Effect::CancelLock => {}
            }
        }
    }
    armed
}

fn target(id: &str, words: usize) -> Target {
    Target {
        identifier: Some(id.to_owned()),
        source_url: Some(format!("https://review.example.org/c/1/1/mod.py@{id}")),
        before_text: "def f():\n    return 1\n".into(),
        after_text: "def f():\n    return 2\n".into(),
        side: Side::Revision,
        comment_range_start: 2,
        comment_range_end: 2,
        comment_body: vec!["word"; words].join(" "),
    }
}

#[test]
fn skip_advances_to_next_target() {
    let api = FakeBackend::default();
    api.targets.borrow_mut().extend([Ok(target("c1", 3)), Ok(target("c2", 3))]);
    let mut session = Session::new(Default::default());

    let armed = drive(&mut session, &api, Event::Start);
    assert_eq!(armed.len(), 1);
    assert_eq!(armed[0].duration.as_millis(), 1000);
    assert_eq!(session.state().phase(), &Phase::AwaitingRead);
    assert_eq!(session.state().info().annotator_identity, "me@example.org");

    drive(&mut session, &api, Event::LabelClicked(Label::Skip));

    assert_eq!(*api.submitted.borrow(), [Label::Skip]);
    assert_eq!(session.state().submission_count(), 1);
    assert_eq!(*api.target_calls.borrow(), 2);
    let current = session.state().target().and_then(|t| t.identifier.clone());
    assert_eq!(current.as_deref(), Some("c2"));
    assert_eq!(session.state().info().annotated_by_current_count, 1);
}

#[test]
fn long_comment_holds_the_lock_for_two_minutes() {
    let api = FakeBackend::default();
    api.targets.borrow_mut().push_back(Ok(target("c1", 1000)));
    let mut session = Session::new(Default::default());

    let armed = drive(&mut session, &api, Event::Start);
    assert_eq!(armed[0].duration.as_millis(), 120_000);

    drive(&mut session, &api, Event::LabelClicked(Label::Refactoring));
    assert!(api.submitted.borrow().is_empty());

    drive(&mut session, &api, Event::LockReleased { generation: armed[0].generation });
    drive(&mut session, &api, Event::LabelClicked(Label::Refactoring));
    assert_eq!(*api.submitted.borrow(), [Label::Refactoring]);
}

#[test]
fn failed_fetch_then_manual_retry() {
    let api = FakeBackend::default();
    api.targets.borrow_mut().extend([
        Err(ApiError::Server { status: 500, body: "boom".into() }),
        Ok(target("c1", 3)),
    ]);
    let mut session = Session::new(Default::default());

    let armed = drive(&mut session, &api, Event::Start);
    assert!(armed.is_empty());
    assert!(session.state().is_stalled());
    assert_eq!(*api.target_calls.borrow(), 1);
    assert!(session.state().last_error().unwrap().contains("500"));

    let armed = drive(&mut session, &api, Event::Retry);
    assert_eq!(armed.len(), 1);
    assert_eq!(*api.target_calls.borrow(), 2);
    assert_eq!(session.state().phase(), &Phase::AwaitingRead);
    assert_eq!(session.state().last_error(), None);
}

#[test]
fn failed_submission_keeps_target_and_count() {
    let api = FakeBackend::default();
    api.targets.borrow_mut().extend([Ok(target("c1", 3)), Ok(target("c2", 3))]);
    api.submissions
        .borrow_mut()
        .push_back(Err(ApiError::Network("reset".into())));
    let mut session = Session::new(Default::default());

    let armed = drive(&mut session, &api, Event::Start);
    drive(&mut session, &api, Event::LockReleased { generation: armed[0].generation });
    drive(&mut session, &api, Event::LabelClicked(Label::Documentation));

    assert_eq!(session.state().phase(), &Phase::Ready);
    assert_eq!(session.state().submission_count(), 0);
    assert_eq!(*api.target_calls.borrow(), 1);

    drive(&mut session, &api, Event::LabelClicked(Label::Documentation));
    assert_eq!(*api.submitted.borrow(), [Label::Documentation]);
    assert_eq!(session.state().submission_count(), 1);
    assert_eq!(*api.target_calls.borrow(), 2);
}
