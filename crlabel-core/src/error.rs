/// Failure of a single request to the annotation backend.
///
/// A failed call never partially applies: callers treat it as "nothing
/// happened this cycle" and may simply re-issue the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, timeout, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("server error: HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// A 2xx response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Transport failures and 5xx/429 responses may succeed when retried; a
    /// 4xx means the request itself is wrong.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Server { status, .. } => *status == 429 || *status >= 500,
            ApiError::InvalidResponse(_) => false,
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                ApiError::Server { status, body }
            }
            ureq::Error::Transport(transport) => ApiError::Network(transport.to_string()),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
