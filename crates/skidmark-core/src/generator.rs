// The text-generation capability the roast pipeline depends on.

use async_trait::async_trait;

/// Something that turns a prompt into raw response text.
///
/// Implementations own their transport, timeouts and retries. Any error is
/// fatal for the request that triggered it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
