// Skidmark entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config
// 3. Build the LLM client and batch coordinator
// 4. Serve HTTP until Ctrl+C

use std::sync::Arc;

use skidmark_app::config;
use skidmark_app::server;
use skidmark_core::{BatchCoordinator, TextGenerator};
use skidmark_llm::LlmClient;

use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Skidmark starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: model={}, batch_size={}, max_tokens={}",
        config.llm.model, config.batching.batch_size, config.llm.max_tokens
    );

    // 3. Build the LLM client and coordinator
    let llm_client = LlmClient::from_config(&config.llm_settings());
    if llm_client.is_active() {
        info!("LLM client initialized (API key configured)");
    } else {
        warn!("LLM client disabled (no API key); roast requests will fail");
    }
    let generator: Arc<dyn TextGenerator> = Arc::new(llm_client);
    let coordinator = BatchCoordinator::new(generator, config.batching.batch_size);

    // 4. Serve
    let app = server::router(coordinator);
    server::serve(&config.server, app).await?;

    info!("Skidmark shut down cleanly");
    Ok(())
}

/// Initialize tracing to stderr so stdout stays free for callers.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skidmark=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
