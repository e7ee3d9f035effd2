//! annotation-agent - Transcription agent for the audio annotation platform
//!
//! Requests one task from the platform, downloads its audio, produces a
//! transcription, submits the result (or skips the task), and reports the
//! agent's lifetime statistics.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use annotation_agent::config::AgentConfig;
use annotation_agent::workflow;

/// Command-line arguments for annotation-agent
///
/// Every value falls back to its environment variable, then to a demo
/// default suitable for a local platform instance.
#[derive(Parser, Debug)]
#[command(name = "annotation-agent")]
#[command(about = "Transcription agent for the audio annotation platform")]
#[command(version)]
struct Args {
    /// API key forwarded as X-API-Key (falls back to $API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Platform base URL (falls back to $BASE_URL, then http://localhost:8010)
    #[arg(long)]
    base_url: Option<String>,

    /// Numeric agent identifier (falls back to $AGENT_ID, then 123)
    #[arg(long)]
    agent_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "annotation_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting annotation-agent v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = AgentConfig::resolve(args.api_key, args.base_url, args.agent_id)?;
    info!("Platform: {}", config.base_url);
    info!("Agent id: {}", config.agent_id);

    match workflow::run(&config).await {
        Ok(outcome) => {
            info!("Run finished: {:?}", outcome);
            Ok(())
        }
        Err(e) => {
            error!("✗ Run failed: {:#}", e);
            Err(e)
        }
    }
}
