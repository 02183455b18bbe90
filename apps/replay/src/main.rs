use std::sync::Arc;

use anyhow::Context;
use referral_replay::config::Config;
use referral_replay::{init_tracing, replay, TracingErrorSink};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber reads REFERRAL_LOG_FORMAT
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env();

    tracing::info!("Replaying {}", config.replay_file.display());
    let file = tokio::fs::File::open(&config.replay_file)
        .await
        .with_context(|| format!("Failed to open {}", config.replay_file.display()))?;

    let summary = replay(&config, BufReader::new(file), Arc::new(TracingErrorSink)).await?;
    tracing::info!(
        "Replay finished: {} lines dispatched, {} skipped",
        summary.lines_dispatched,
        summary.lines_skipped
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
