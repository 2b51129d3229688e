//! Local PDF download and text extraction.
//!
//! PDFs are downloaded to a local cache directory and parsed in-process
//! rather than sent through the page renderer, which tends to time out
//! on large documents.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{FetchError, FetchResult};
use crate::types::FetchConfig;

/// Text extracted from one PDF.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub text: String,

    /// Where the downloaded bytes live on disk
    pub file_path: PathBuf,

    pub file_size_bytes: u64,

    /// Total pages in the document, including any beyond the parse cap
    pub page_count: u32,

    /// Pages actually parsed
    pub pages_parsed: u32,
}

/// Downloads PDFs into a cache directory and extracts their text.
pub struct DocumentFetcher {
    client: Client,
    cache_dir: PathBuf,
    max_pages: usize,
}

impl DocumentFetcher {
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.download_timeout)
            .build()
            .map_err(FetchError::http)?;

        Ok(Self {
            client,
            cache_dir: config.cache_dir.clone(),
            max_pages: config.max_pdf_pages,
        })
    }

    /// Fetch and parse one PDF, reusing a previously downloaded copy
    /// when one exists.
    pub async fn fetch(&self, url: &str) -> FetchResult<ParsedDocument> {
        let path = self.cache_path(url);
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        if tokio::fs::try_exists(&path).await? {
            debug!(url, path = %path.display(), "using cached document");
        } else {
            self.download(url, &path).await?;
        }

        let bytes = tokio::fs::read(&path).await?;
        let file_size_bytes = bytes.len() as u64;

        let max_pages = self.max_pages;
        let source_url = url.to_string();
        // pdf parsing is CPU-bound, keep it off the async runtime
        let (text, page_count, pages_parsed) = tokio::task::spawn_blocking(move || {
            extract_pages(&bytes, max_pages).map_err(|e| FetchError::PdfParse {
                url: source_url,
                message: e.to_string(),
            })
        })
        .await
        .map_err(|e| FetchError::PdfParse {
            url: url.to_string(),
            message: format!("parse task failed: {e}"),
        })??;

        if text.trim().is_empty() {
            return Err(FetchError::EmptyContent {
                url: url.to_string(),
            });
        }

        info!(
            url,
            chars = text.len(),
            pages_parsed,
            page_count,
            "extracted document text"
        );

        Ok(ParsedDocument {
            text,
            file_path: path,
            file_size_bytes,
            page_count,
            pages_parsed,
        })
    }

    async fn download(&self, url: &str, path: &Path) -> FetchResult<()> {
        debug!(url, "downloading document");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::http(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::http_msg(format!(
                "HTTP {} fetching {}",
                response.status(),
                url
            )));
        }

        let bytes = response.bytes().await.map_err(FetchError::http)?;
        tokio::fs::write(path, &bytes).await?;

        debug!(url, bytes = bytes.len(), "document downloaded");
        Ok(())
    }

    /// Derive a stable cache filename from the URL's last path segment.
    fn cache_path(&self, url: &str) -> PathBuf {
        let last = url
            .rsplit('/')
            .next()
            .unwrap_or(url)
            .split('?')
            .next()
            .unwrap_or(url);

        let filename = if last.to_lowercase().ends_with(".pdf") && !last.is_empty() {
            last.to_string()
        } else {
            let sanitized: String = last
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            format!("{sanitized}.pdf")
        };

        self.cache_dir.join(filename)
    }
}

/// Extract text page by page, stopping at `max_pages`.
///
/// Returns the joined text, the document's total page count, and the
/// number of pages actually parsed. The cap bounds the output text,
/// not the parse: `extract_text_from_mem_by_pages` walks the whole
/// document before we truncate. pdf-extract has no page-limited entry
/// point today.
fn extract_pages(
    bytes: &[u8],
    max_pages: usize,
) -> Result<(String, u32, u32), pdf_extract::OutputError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)?;
    let page_count = pages.len() as u32;
    let pages_parsed = pages.len().min(max_pages);

    let text = pages
        .into_iter()
        .take(pages_parsed)
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok((text, page_count, pages_parsed as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FetchConfig;

    fn fetcher_with_cache(dir: &str) -> DocumentFetcher {
        let config = FetchConfig::default().with_cache_dir(dir);
        DocumentFetcher::new(&config).unwrap()
    }

    #[test]
    fn cache_path_keeps_pdf_filename() {
        let fetcher = fetcher_with_cache("/tmp/harvest-test");
        let path = fetcher.cache_path("https://example.gov.au/reports/annual-2024.pdf");
        assert_eq!(path, PathBuf::from("/tmp/harvest-test/annual-2024.pdf"));
    }

    #[test]
    fn cache_path_strips_query() {
        let fetcher = fetcher_with_cache("/tmp/harvest-test");
        let path = fetcher.cache_path("https://example.gov.au/doc.pdf?version=3");
        assert_eq!(path, PathBuf::from("/tmp/harvest-test/doc.pdf"));
    }

    #[test]
    fn cache_path_sanitizes_non_pdf_segment() {
        let fetcher = fetcher_with_cache("/tmp/harvest-test");
        let path = fetcher.cache_path("https://example.gov.au/pdf/view-report");
        assert_eq!(path, PathBuf::from("/tmp/harvest-test/view_report.pdf"));
    }
}
