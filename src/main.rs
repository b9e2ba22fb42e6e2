use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use prompt_proxy::config::{
    DEFAULT_API_BASE, DEFAULT_MAX_BODY_BYTES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use prompt_proxy::{AppState, PromptPolicy, ProxyConfig, router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prompt-proxy")]
#[command(about = "Forwards prompts to the Gemini API with a server-held key")]
struct Args {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Server host
    #[arg(long, default_value = "0.0.0.0", env = "PROXY_HOST")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 8888, env = "PROXY_PORT")]
    port: u16,

    #[arg(long, default_value = DEFAULT_API_BASE, env = "GEMINI_API_BASE")]
    api_base: String,

    #[arg(long, default_value = DEFAULT_MODEL, env = "GEMINI_MODEL")]
    model: String,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "UPSTREAM_TIMEOUT_SECS")]
    timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = PromptPolicy::Permissive, env = "PROMPT_POLICY")]
    prompt_policy: PromptPolicy,

    /// Largest inbound request body accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, env = "MAX_BODY_BYTES")]
    max_body_bytes: usize,
}

impl From<Args> for ProxyConfig {
    fn from(args: Args) -> Self {
        Self {
            api_key: args.api_key,
            api_base: args.api_base,
            model: args.model,
            timeout: Duration::from_secs(args.timeout_secs),
            prompt_policy: args.prompt_policy,
            max_body_bytes: args.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("prompt_proxy=info,tower_http=info")),
        )
        .try_init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);
    let config = ProxyConfig::from(args);

    info!("Starting prompt proxy");
    info!("  Model: {}", config.model);
    info!("  Timeout: {:?}", config.timeout);
    info!("  Prompt policy: {:?}", config.prompt_policy);
    info!("  Max body bytes: {}", config.max_body_bytes);
    if config.api_key().is_none() {
        warn!("GEMINI_API_KEY is not set; every request will fail with 500");
    }

    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
