use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::error::Error as _;
use thiserror::Error;
use tracing::warn;

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("API key is not configured.")]
    MissingApiKey,

    #[error("Prompt must be a non-empty string.")]
    EmptyPrompt,

    #[error("{}", .0.body_text())]
    Body(BytesRejection),

    #[error("{0}")]
    InvalidRequest(serde_json::Error),

    #[error("API request failed: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("{}", transport_message(.0))]
    Transport(reqwest::Error),

    #[error("{0}")]
    InvalidUpstreamBody(serde_json::Error),
}

// The request URL carries the API key as a query parameter, so it is dropped
// before the error can reach a client or a log line.
impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Transport(err.without_url())
    }
}

/// reqwest's top-level message plus its source chain, e.g.
/// `error sending request: client error (Connect): tcp connect error: Connection refused`.
fn transport_message(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::EmptyPrompt => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::Body(rejection) => rejection.status(),
            ProxyError::MissingApiKey
            | ProxyError::InvalidRequest(_)
            | ProxyError::Transport(_)
            | ProxyError::InvalidUpstreamBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), "request failed: {self}");
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
