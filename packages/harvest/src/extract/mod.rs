//! Extraction: turning raw text into structured candidate facts.

mod pool;
mod prompt;
pub mod providers;

pub use pool::{ProviderPool, FAILURE_CEILING};
pub use prompt::{build_extraction_prompt, strip_code_fences};

use tracing::{debug, warn};

use crate::error::ProviderResult;
use crate::types::{ExtractConfig, StructuredFacts};

/// Runs the extraction prompt over a provider pool.
pub struct Extractor {
    pool: ProviderPool,
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(pool: ProviderPool, config: ExtractConfig) -> Self {
        Self { pool, config }
    }

    /// Extract structured facts from one document's text.
    ///
    /// Returns `Ok(None)` when the text is too short to bother with, or
    /// when the provider's response does not decode as the fact schema.
    /// Provider errors, including pool exhaustion, propagate.
    pub async fn extract(
        &self,
        text: &str,
        jurisdiction: &str,
    ) -> ProviderResult<Option<StructuredFacts>> {
        if text.len() < self.config.min_text_len {
            debug!(chars = text.len(), "text too short for extraction");
            return Ok(None);
        }

        let prompt = build_extraction_prompt(text, jurisdiction, self.config.text_budget);
        let response = self
            .pool
            .complete(&prompt, self.config.max_output_tokens)
            .await?;

        let cleaned = strip_code_fences(&response);
        match serde_json::from_str::<StructuredFacts>(cleaned) {
            Ok(facts) => Ok(Some(facts)),
            Err(err) => {
                warn!(%err, "provider response did not decode as facts");
                Ok(None)
            }
        }
    }
}
