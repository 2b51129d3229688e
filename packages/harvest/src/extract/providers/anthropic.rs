//! Anthropic implementation of the reasoning provider trait.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};
use crate::extract::providers::is_capacity_signal;
use crate::traits::ReasoningProvider;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider.
///
/// First in the default fallback chain.
pub struct AnthropicProvider {
    client: Client,
    api_key: SecretString,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into().into(),
            model: "claude-sonnet-4-20250514".to_string(),
        }
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable, or
    /// `None` when it is not set.
    pub fn from_env() -> Option<Self> {
        std::env::var("ANTHROPIC_API_KEY").ok().map(Self::new)
    }

    /// Set the model (default: claude-sonnet-4-20250514).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl ReasoningProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> ProviderResult<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{ANTHROPIC_API_URL}/messages"))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Api {
                provider: self.name().to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_failure("anthropic", status, message));
        }

        let body: MessagesResponse = response.json().await.map_err(|e| ProviderError::Api {
            provider: self.name().to_string(),
            message: e.to_string(),
        })?;

        body.content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::Api {
                provider: self.name().to_string(),
                message: "no text content in response".to_string(),
            })
    }
}

/// Sort an HTTP failure into the capacity or API class.
pub(crate) fn classify_failure(
    provider: &str,
    status: StatusCode,
    message: String,
) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::PAYMENT_REQUIRED
        || is_capacity_signal(&message)
    {
        ProviderError::Capacity {
            provider: provider.to_string(),
            message,
        }
    } else {
        ProviderError::Api {
            provider: provider.to_string(),
            message,
        }
    }
}
