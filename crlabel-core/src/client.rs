//! Request layer for the annotation backend.
//!
//! Stateless: every call is one HTTP round-trip and no call is retried here.
//! Retry policy belongs to the session controller. The blocking `ureq` client
//! is driven from a dedicated worker thread so the UI loop never waits on it.

use std::time::Duration;

use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::types::{Label, SessionInfo, Target};

/// Backend operations consumed by the session.
///
/// `submit_label` carries no target identifier: the backend applies it to
/// whatever it currently serves as this annotator's target.
pub trait AnnotationApi {
    /// `GET /api/target`
    fn fetch_current_target(&self) -> ApiResult<Target>;
    /// `GET /api/info`
    fn fetch_session_info(&self) -> ApiResult<SessionInfo>;
    /// `PUT /api/target?label=<LABEL>`
    fn submit_label(&self, label: Label) -> ApiResult<()>;
}

/// `AnnotationApi` over HTTP/JSON.
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpClient {
    /// `base_url` is the backend origin, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.agent.get(&url).call()?;
        response
            .into_json::<T>()
            .map_err(|e| ApiError::InvalidResponse(format!("{path}: {e}")))
    }
}

impl AnnotationApi for HttpClient {
    fn fetch_current_target(&self) -> ApiResult<Target> {
        self.get_json("/api/target")
    }

    fn fetch_session_info(&self) -> ApiResult<SessionInfo> {
        self.get_json("/api/info")
    }

    fn submit_label(&self, label: Label) -> ApiResult<()> {
        let url = self.url("/api/target");
        debug!(%url, label = label.wire_name(), "PUT");
        self.agent
            .put(&url)
            .query("label", label.wire_name())
            .call()?;
        Ok(())
    }
}
