//! Fetch layer: URL classification, page rendering, local PDF parsing.

mod classify;
mod document;
mod firecrawl;

pub use classify::{classify_url, UrlKind};
pub use document::{DocumentFetcher, ParsedDocument};
pub use firecrawl::FirecrawlRenderer;

use tracing::info;

use crate::error::{FetchError, FetchResult};
use crate::traits::PageRenderer;
use crate::types::{FetchConfig, RawContent, SourceKind};

/// Everything one fetch produces.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub content: RawContent,

    /// Outgoing links found on the page (empty for documents)
    pub links: Vec<String>,

    /// Page title, when the renderer reported one
    pub title: Option<String>,
}

/// Dispatches each URL to its fetch branch.
///
/// Webpages go through the page renderer; PDFs are downloaded and
/// parsed locally. Both branches produce a [`RawContent`] row.
pub struct Fetcher<R: PageRenderer> {
    renderer: R,
    documents: DocumentFetcher,
}

impl<R: PageRenderer> Fetcher<R> {
    pub fn new(renderer: R, config: &FetchConfig) -> FetchResult<Self> {
        Ok(Self {
            renderer,
            documents: DocumentFetcher::new(config)?,
        })
    }

    pub async fn fetch(&self, url: &str) -> FetchResult<Fetched> {
        match classify_url(url) {
            UrlKind::Unfetchable => Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
            }),
            UrlKind::Document => self.fetch_document(url).await,
            UrlKind::Page => self.fetch_page(url).await,
        }
    }

    async fn fetch_document(&self, url: &str) -> FetchResult<Fetched> {
        let parsed = self.documents.fetch(url).await?;

        let content = RawContent::new(url, SourceKind::Pdf, parsed.text, "pdf-extract")
            .with_file(
                parsed.file_path.to_string_lossy().into_owned(),
                parsed.file_size_bytes,
            )
            .with_page_count(parsed.page_count);

        Ok(Fetched {
            content,
            links: Vec::new(),
            title: None,
        })
    }

    async fn fetch_page(&self, url: &str) -> FetchResult<Fetched> {
        let page = self.renderer.render(url).await?;

        info!(url, chars = page.markdown.len(), "page rendered");

        let content = RawContent::new(url, SourceKind::Webpage, page.markdown, "firecrawl");

        Ok(Fetched {
            content,
            links: page.links,
            title: page.title,
        })
    }
}
