//! OpenAI-compatible chat completions provider.
//!
//! Covers both OpenAI itself and Groq, which speaks the same wire
//! protocol from a different base URL.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};
use crate::extract::providers::anthropic::classify_failure;
use crate::traits::ReasoningProvider;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

/// Chat-completions provider for any OpenAI-compatible API.
pub struct OpenAiProvider {
    client: Client,
    api_key: SecretString,
    name: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OpenAiProvider {
    /// OpenAI with the default model (gpt-4o-mini).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into().into(),
            name: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Groq with the default model (llama-3.3-70b-versatile).
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into().into(),
            name: "groq".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            base_url: GROQ_API_URL.to_string(),
        }
    }

    /// OpenAI from `OPENAI_API_KEY`, or `None` when it is not set.
    pub fn openai_from_env() -> Option<Self> {
        std::env::var("OPENAI_API_KEY").ok().map(Self::openai)
    }

    /// Groq from `GROQ_API_KEY`, or `None` when it is not set.
    pub fn groq_from_env() -> Option<Self> {
        std::env::var("GROQ_API_KEY").ok().map(Self::groq)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (proxies, self-hosted gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl ReasoningProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> ProviderResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Api {
                provider: self.name.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_failure(&self.name, status, message));
        }

        let body: ChatResponse = response.json().await.map_err(|e| ProviderError::Api {
            provider: self.name.clone(),
            message: e.to_string(),
        })?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::Api {
                provider: self.name.clone(),
                message: "no choices in response".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groq_and_openai_share_the_protocol() {
        let openai = OpenAiProvider::openai("sk-test");
        let groq = OpenAiProvider::groq("gsk-test");

        assert_eq!(openai.name, "openai");
        assert_eq!(groq.name, "groq");
        assert!(groq.base_url.contains("groq.com"));
    }

    #[test]
    fn builder_overrides() {
        let provider = OpenAiProvider::openai("sk-test")
            .with_model("gpt-4o")
            .with_base_url("https://proxy.internal/v1");

        assert_eq!(provider.model, "gpt-4o");
        assert_eq!(provider.base_url, "https://proxy.internal/v1");
    }
}
