//! Executes the effects the session asks for.
//!
//! Backend calls go to the API worker; lock timeouts and backoff delays become
//! tokio tasks that report back on the event bus. Nothing here decides
//! anything, it only carries out what `AppState::dispatch` returned.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crlabel_core::reading_lock::LockTimer;
use crlabel_core::session::Effect;

use crate::api::types::ApiRequest;
use crate::api::worker::AsyncApi;
use crate::event::AppEvent;

pub struct Driver {
    api: AsyncApi,
    timer: LockTimer,
    events: UnboundedSender<AppEvent>,
}

impl Driver {
    pub fn new(api: AsyncApi, events: UnboundedSender<AppEvent>) -> Self {
        Self { api, timer: LockTimer::new(), events }
    }

    pub fn execute_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute(effect);
        }
    }

    pub fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::FetchTarget { op, delay: None } => {
                self.api.send(ApiRequest::FetchTarget(op));
            }
            Effect::FetchTarget { op, delay: Some(delay) } => {
                debug!(op = op.0, ?delay, "target fetch scheduled");
                let sender = self.api.sender();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if sender.send(ApiRequest::FetchTarget(op)).is_err() {
                        warn!(op = op.0, "api worker is gone; delayed fetch dropped");
                    }
                });
            }
            Effect::FetchInfo { op } => {
                self.api.send(ApiRequest::FetchInfo(op));
            }
            Effect::ArmLock(ticket) => {
                debug!(generation = ticket.generation.0, duration = ?ticket.duration, "reading lock armed");
                let events = self.events.clone();
                self.timer.arm(ticket, move |generation| {
                    let _ = events.send(AppEvent::LockReleased(generation));
                });
            }
            Effect::CancelLock => self.timer.cancel(),
            Effect::SubmitLabel { op, label, target_id } => {
                info!(op = op.0, label = label.wire_name(), target = ?target_id, "submitting label");
                self.api.send(ApiRequest::SubmitLabel { op, label });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crlabel_core::error::{ApiError, ApiResult};
    use crlabel_core::reading_lock::{LockGeneration, LockTicket};
    use crlabel_core::session::OpId;
    use crlabel_core::types::{Label, SessionInfo, Target};

    struct IdleBackend;

    impl crlabel_core::client::AnnotationApi for IdleBackend {
        fn fetch_current_target(&self) -> ApiResult<Target> {
            Err(ApiError::Network("offline".into()))
        }
        fn fetch_session_info(&self) -> ApiResult<SessionInfo> {
            Ok(SessionInfo::default())
        }
        fn submit_label(&self, _label: Label) -> ApiResult<()> {
            Ok(())
        }
    }

    fn driver() -> (Driver, tokio::sync::mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let api = AsyncApi::spawn(IdleBackend, tx.clone()).unwrap();
        (Driver::new(api, tx), rx)
    }

    #[tokio::test]
    async fn armed_lock_reports_its_generation() {
        let (mut driver, mut rx) = driver();
        driver.execute(Effect::ArmLock(LockTicket {
            generation: LockGeneration(7),
            duration: Duration::from_millis(10),
        }));
        match rx.recv().await {
            Some(AppEvent::LockReleased(generation)) => assert_eq!(generation, LockGeneration(7)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_lock_never_fires() {
        let (mut driver, mut rx) = driver();
        driver.execute(Effect::ArmLock(LockTicket {
            generation: LockGeneration(1),
            duration: Duration::from_millis(20),
        }));
        driver.execute(Effect::CancelLock);
        assert!(!driver.timer.is_pending());
        driver.execute(Effect::SubmitLabel { op: OpId(4), label: Label::Skip, target_id: None });
        match rx.recv().await {
            Some(AppEvent::Api(response)) => {
                assert!(matches!(
                    response.into_event(),
                    crlabel_core::session::Event::SubmissionSucceeded { op: OpId(4) }
                ));
            }
            other => panic!("unexpected {other:?}"),
        }
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn delayed_fetch_reaches_the_worker() {
        let (mut driver, mut rx) = driver();
        driver.execute(Effect::FetchTarget { op: OpId(2), delay: Some(Duration::from_millis(5)) });
        match rx.recv().await {
            Some(AppEvent::Api(response)) => assert!(matches!(
                response.into_event(),
                crlabel_core::session::Event::TargetFailed { op: OpId(2), .. }
            )),
            other => panic!("unexpected {other:?}"),
        }
    }
}
