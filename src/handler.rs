use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::{Level, info};

use crate::PromptRequest;
use crate::config::{PromptPolicy, ProxyConfig};
use crate::error::{ProxyError, Result};
use crate::payload::build_payload;
use crate::upstream::GeminiClient;

/// Path the existing front-end posts to.
pub const FUNCTION_PATH: &str = "/.netlify/functions/generate-idea";

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ProxyConfig,
    pub upstream: GeminiClient,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let upstream = GeminiClient::new(&config)?;
        Ok(Self { config, upstream })
    }
}

/// Parses `body`, checks the credential and prompt policy, then makes the
/// single upstream call. The upstream JSON body is returned untouched.
pub async fn handle_prompt(state: &AppState, body: &[u8]) -> Result<Bytes> {
    let request: PromptRequest =
        serde_json::from_slice(body).map_err(ProxyError::InvalidRequest)?;

    let Some(api_key) = state.config.api_key() else {
        return Err(ProxyError::MissingApiKey);
    };

    let prompt = request.prompt.as_deref();
    if state.config.prompt_policy == PromptPolicy::Strict
        && prompt.is_none_or(|p| p.trim().is_empty())
    {
        return Err(ProxyError::EmptyPrompt);
    }

    let payload = build_payload(prompt);
    let result = state.upstream.generate(api_key, &payload).await?;
    info!(
        prompt_len = prompt.map_or(0, str::len),
        "generated content"
    );
    Ok(result)
}

async fn generate_idea(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse> {
    let body = body.map_err(ProxyError::Body)?;
    let result = handle_prompt(&state, &body).await?;
    Ok(([(CONTENT_TYPE, "application/json")], result))
}

async fn fallback() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

pub fn router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route(FUNCTION_PATH, post(generate_idea))
        .route("/generate-idea", post(generate_idea))
        .with_state(state)
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
