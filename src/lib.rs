use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod handler;
pub mod payload;
pub mod upstream;

pub use config::{PromptPolicy, ProxyConfig};
pub use error::{ProxyError, Result};
pub use handler::{AppState, handle_prompt, router};
pub use payload::{GenerateContentRequest, build_payload};
pub use upstream::GeminiClient;

/// Body sent by the front-end. Any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: Option<String>,
}
