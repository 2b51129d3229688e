//! Page rendering trait for fetching webpage content.

use async_trait::async_trait;

use crate::error::FetchResult;

/// A rendered webpage: readable text plus the links found in it.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page body as markdown-ish plain text
    pub markdown: String,

    /// Absolute URLs discovered on the page
    pub links: Vec<String>,

    /// Page title, when the renderer could determine one
    pub title: Option<String>,
}

/// Renders a webpage into readable text.
///
/// Implementations handle JavaScript-heavy pages however they see fit;
/// the pipeline only cares about the markdown and the outgoing links.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> FetchResult<RenderedPage>;
}
