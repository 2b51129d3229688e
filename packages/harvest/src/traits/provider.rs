//! Reasoning provider trait for structured fact extraction.

use async_trait::async_trait;

use crate::error::ProviderResult;

/// A hosted language model that turns a prompt into text.
///
/// Providers return the raw completion string; JSON parsing and repair
/// happen above this seam so every provider is interchangeable.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Short stable name used in logs and failure accounting.
    fn name(&self) -> &str;

    /// Run one completion. Implementations classify capacity-style
    /// failures (rate limits, exhausted credit) as
    /// [`ProviderError::Capacity`](crate::error::ProviderError::Capacity)
    /// so the pool can fall through to the next provider.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> ProviderResult<String>;
}
