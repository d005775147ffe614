//! Background threads that share the HTTP client.
//!
//! Requests run on two lanes, each a thread fed by its own channel:
//! target fetches and submissions share one lane so they stay in issue order;
//! info fetches get the other, so a slow `/api/info` never holds up labeling.
//! Both lanes answer with `AppEvent::Api` and end once their sender is
//! dropped.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crlabel_core::client::AnnotationApi;

use crate::api::types::{ApiRequest, ApiResponse};
use crate::event::AppEvent;

/// Handle to the running workers.
pub struct AsyncApi {
    queue_tx: Sender<ApiRequest>,
    info_tx: Sender<ApiRequest>,
    _threads: [JoinHandle<()>; 2],
}

impl AsyncApi {
    /// Shares `client` between the two lane threads and starts serving.
    pub fn spawn<A>(client: A, event_tx: UnboundedSender<AppEvent>) -> std::io::Result<Self>
    where
        A: AnnotationApi + Send + Sync + 'static,
    {
        let client = Arc::new(client);
        let (queue_tx, queue_rx) = crossbeam_channel::unbounded();
        let (info_tx, info_rx) = crossbeam_channel::unbounded();

        let queue = {
            let client = Arc::clone(&client);
            let event_tx = event_tx.clone();
            std::thread::Builder::new()
                .name("crlabel-api".into())
                .spawn(move || api_worker_loop(client, queue_rx, event_tx))?
        };
        let info = std::thread::Builder::new()
            .name("crlabel-info".into())
            .spawn(move || api_worker_loop(client, info_rx, event_tx))?;

        Ok(Self { queue_tx, info_tx, _threads: [queue, info] })
    }

    /// Sender for the target/submission lane. The delayed-retry timer queues
    /// its fetch through a clone of this.
    pub fn sender(&self) -> Sender<ApiRequest> {
        self.queue_tx.clone()
    }

    pub fn send(&self, request: ApiRequest) {
        let lane = match request {
            ApiRequest::FetchInfo(_) => &self.info_tx,
            ApiRequest::FetchTarget(_) | ApiRequest::SubmitLabel { .. } => &self.queue_tx,
        };
        if lane.send(request).is_err() {
            warn!("api worker is gone; request dropped");
        }
    }
}

/// Serves one lane until its channel closes or the event bus is gone.
pub fn api_worker_loop<A: AnnotationApi>(
    client: Arc<A>,
    rx: Receiver<ApiRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    for request in rx {
        let response = handle_request(client.as_ref(), request);
        if event_tx.send(AppEvent::Api(Box::new(response))).is_err() {
            debug!("event bus closed; api worker exiting");
            return;
        }
    }
}

fn handle_request<A: AnnotationApi>(client: &A, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::FetchTarget(op) => {
            let result = client.fetch_current_target();
            match &result {
                Ok(target) => info!(op = op.0, id = ?target.identifier, "target fetched"),
                Err(e) => warn!(op = op.0, error = %e, "target fetch failed"),
            }
            ApiResponse::Target { op, result }
        }
        ApiRequest::FetchInfo(op) => {
            let result = client.fetch_session_info();
            if let Err(e) = &result {
                warn!(op = op.0, error = %e, "info fetch failed");
            }
            ApiResponse::Info { op, result }
        }
        ApiRequest::SubmitLabel { op, label } => {
            let result = client.submit_label(label);
            match &result {
                Ok(()) => info!(op = op.0, label = label.wire_name(), "label submitted"),
                Err(e) => warn!(op = op.0, label = label.wire_name(), error = %e, "label submission failed"),
            }
            ApiResponse::Submitted { op, result }
        }
    }
}
