use clap::Parser;
use prompt_proxy::PromptRequest;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Sends one prompt to a running proxy and prints what comes back.
#[derive(Parser, Debug)]
struct Args {
    /// Proxy endpoint
    #[arg(
        long,
        default_value = "http://127.0.0.1:8888/.netlify/functions/generate-idea"
    )]
    url: String,

    prompt: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();
    println!("Sending prompt to {}: {}", args.url, args.prompt);

    let res = reqwest::Client::new()
        .post(&args.url)
        .json(&PromptRequest {
            prompt: Some(args.prompt),
        })
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;
    println!("Status: {status}");
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => println!("{text}"),
    }

    if !status.is_success() {
        return Err(format!("proxy returned {status}").into());
    }
    Ok(())
}
