//! Firecrawl-backed page renderer.
//!
//! Uses the Firecrawl API to render JavaScript-heavy pages into
//! markdown plus the outgoing links needed for frontier discovery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, FetchResult};
use crate::traits::{PageRenderer, RenderedPage};

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

/// Page renderer backed by the Firecrawl scrape API.
///
/// # Example
///
/// ```rust,ignore
/// use harvest::fetch::FirecrawlRenderer;
///
/// let renderer = FirecrawlRenderer::from_env()?;
/// let page = renderer.render("https://example.gov.au/programs").await?;
/// ```
pub struct FirecrawlRenderer {
    client: Client,
    api_key: SecretString,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct ScrapeRequest {
    url: String,
    formats: Vec<String>,
    timeout: u64,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    #[serde(default)]
    links: Vec<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize)]
struct PageMetadata {
    title: Option<String>,
}

impl FirecrawlRenderer {
    /// Create a new renderer with the given API key.
    pub fn new(api_key: impl Into<String>) -> FetchResult<Self> {
        let timeout = Duration::from_secs(60);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::http)?;

        Ok(Self {
            client,
            api_key: api_key.into().into(),
            timeout_ms: 30_000,
        })
    }

    /// Create from the `FIRECRAWL_API_KEY` environment variable.
    pub fn from_env() -> FetchResult<Self> {
        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .map_err(|_| FetchError::Render("FIRECRAWL_API_KEY not set".to_string()))?;
        Self::new(api_key)
    }

    /// Set the per-page render timeout passed to the API (milliseconds).
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

#[async_trait]
impl PageRenderer for FirecrawlRenderer {
    async fn render(&self, url: &str) -> FetchResult<RenderedPage> {
        let request = ScrapeRequest {
            url: url.to_string(),
            formats: vec!["markdown".to_string(), "links".to_string()],
            timeout: self.timeout_ms,
        };

        let response = self
            .client
            .post(format!("{FIRECRAWL_API_URL}/scrape"))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Render(format!(
                "Firecrawl API error: {status} - {text}"
            )));
        }

        let body: ScrapeResponse = response.json().await.map_err(FetchError::http)?;

        if !body.success {
            return Err(FetchError::Render("Firecrawl scrape failed".to_string()));
        }

        let data = body
            .data
            .ok_or_else(|| FetchError::Render("no data returned from Firecrawl".to_string()))?;

        let markdown = data.markdown.unwrap_or_default();
        if markdown.trim().is_empty() {
            return Err(FetchError::EmptyContent {
                url: url.to_string(),
            });
        }

        Ok(RenderedPage {
            markdown,
            links: data.links,
            title: data.metadata.and_then(|m| m.title),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_renderer() {
        assert!(FirecrawlRenderer::new("test-key").is_ok());
    }

    #[test]
    fn test_scrape_response_decodes_links() {
        let json = r##"{
            "success": true,
            "data": {
                "markdown": "# Page",
                "links": ["https://example.com/a", "https://example.com/b"],
                "metadata": { "title": "Page" }
            }
        }"##;

        let response: ScrapeResponse = serde_json::from_str(json).unwrap();
        let data = response.data.unwrap();
        assert_eq!(data.links.len(), 2);
        assert_eq!(data.metadata.unwrap().title.as_deref(), Some("Page"));
    }

    #[test]
    fn test_scrape_response_missing_links_defaults_empty() {
        let json = r#"{ "success": true, "data": { "markdown": "text" } }"#;
        let response: ScrapeResponse = serde_json::from_str(json).unwrap();
        assert!(response.data.unwrap().links.is_empty());
    }
}
