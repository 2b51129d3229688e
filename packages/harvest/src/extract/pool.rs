//! Provider pool with per-provider circuit breaking.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::warn;

use crate::error::{ProviderError, ProviderResult};
use crate::traits::ReasoningProvider;

/// Consecutive capacity failures after which a provider is skipped.
pub const FAILURE_CEILING: u32 = 3;

struct PoolEntry {
    provider: Box<dyn ReasoningProvider>,
    /// Consecutive capacity failures; reset to zero on any success
    failures: AtomicU32,
}

/// An ordered fallback chain of reasoning providers.
///
/// Each call walks the chain in order, skipping providers at their
/// failure ceiling. A capacity failure increments that provider's
/// counter and falls through to the next; any other failure propagates
/// immediately. Success resets the provider's counter, so a recovered
/// provider resumes serving from its position in the chain.
pub struct ProviderPool {
    entries: Vec<PoolEntry>,
}

impl ProviderPool {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build the default chain from whichever API keys are configured:
    /// Anthropic, then Groq, then OpenAI.
    pub fn from_env() -> Self {
        use crate::extract::providers::{AnthropicProvider, OpenAiProvider};

        let mut pool = Self::new();
        if let Some(p) = AnthropicProvider::from_env() {
            pool = pool.with_provider(p);
        }
        if let Some(p) = OpenAiProvider::groq_from_env() {
            pool = pool.with_provider(p);
        }
        if let Some(p) = OpenAiProvider::openai_from_env() {
            pool = pool.with_provider(p);
        }
        pool
    }

    pub fn with_provider(mut self, provider: impl ReasoningProvider + 'static) -> Self {
        self.entries.push(PoolEntry {
            provider: Box::new(provider),
            failures: AtomicU32::new(0),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Run one completion through the chain.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> ProviderResult<String> {
        for entry in &self.entries {
            if entry.failures.load(Ordering::Relaxed) >= FAILURE_CEILING {
                continue;
            }

            match entry.provider.complete(prompt, max_tokens).await {
                Ok(text) => {
                    entry.failures.store(0, Ordering::Relaxed);
                    return Ok(text);
                }
                Err(err) if err.is_capacity() => {
                    let count = entry.failures.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(
                        provider = entry.provider.name(),
                        failures = count,
                        "provider over capacity, trying fallback"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            }
        }

        Err(ProviderError::Exhausted)
    }
}

impl Default for ProviderPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockProvider, ProviderScript};

    #[tokio::test]
    async fn empty_pool_is_exhausted() {
        let pool = ProviderPool::new();
        let result = pool.complete("prompt", 100).await;
        assert!(matches!(result, Err(ProviderError::Exhausted)));
    }

    #[tokio::test]
    async fn capacity_failure_falls_through_to_next_provider() {
        let primary = MockProvider::new("primary").with_script(ProviderScript::AlwaysCapacity);
        let fallback = MockProvider::new("fallback").with_response(r#"{"ok": true}"#);
        let fallback_calls = fallback.calls();

        let pool = ProviderPool::new()
            .with_provider(primary)
            .with_provider(fallback);

        let text = pool.complete("prompt", 100).await.unwrap();
        assert_eq!(text, r#"{"ok": true}"#);
        assert_eq!(fallback_calls.count(), 1);
    }

    #[tokio::test]
    async fn provider_skipped_at_failure_ceiling() {
        let flaky = MockProvider::new("flaky").with_script(ProviderScript::AlwaysCapacity);
        let flaky_calls = flaky.calls();
        let steady = MockProvider::new("steady").with_response("{}");

        let pool = ProviderPool::new()
            .with_provider(flaky)
            .with_provider(steady);

        for _ in 0..5 {
            pool.complete("prompt", 100).await.unwrap();
        }

        // flaky was tried until its third capacity failure, then skipped
        assert_eq!(flaky_calls.count(), FAILURE_CEILING as usize);
    }

    #[tokio::test]
    async fn success_resets_failure_count() {
        let recovering = MockProvider::new("recovering")
            .with_script(ProviderScript::CapacityThenSucceed { failures: 2 });
        let recovering_calls = recovering.calls();
        let backup = MockProvider::new("backup").with_response("{}");

        let pool = ProviderPool::new()
            .with_provider(recovering)
            .with_provider(backup);

        // two capacity failures, then success on the third call
        pool.complete("prompt", 100).await.unwrap();
        pool.complete("prompt", 100).await.unwrap();
        pool.complete("prompt", 100).await.unwrap();

        // counter was reset, so the provider keeps serving
        pool.complete("prompt", 100).await.unwrap();
        assert_eq!(recovering_calls.count(), 4);
    }

    #[tokio::test]
    async fn api_error_propagates_immediately() {
        let broken = MockProvider::new("broken").with_script(ProviderScript::AlwaysFail);
        let untouched = MockProvider::new("untouched").with_response("{}");
        let untouched_calls = untouched.calls();

        let pool = ProviderPool::new()
            .with_provider(broken)
            .with_provider(untouched);

        let result = pool.complete("prompt", 100).await;
        assert!(matches!(result, Err(ProviderError::Api { .. })));
        assert_eq!(untouched_calls.count(), 0);
    }

    #[tokio::test]
    async fn all_providers_at_ceiling_is_exhausted() {
        let only = MockProvider::new("only").with_script(ProviderScript::AlwaysCapacity);
        let pool = ProviderPool::new().with_provider(only);

        for _ in 0..3 {
            assert!(matches!(
                pool.complete("prompt", 100).await,
                Err(ProviderError::Exhausted)
            ));
        }
        // now at the ceiling: skipped without another call
        assert!(matches!(
            pool.complete("prompt", 100).await,
            Err(ProviderError::Exhausted)
        ));
    }
}
