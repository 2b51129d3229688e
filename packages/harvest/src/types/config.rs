//! Configuration for the harvesting pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level pipeline configuration.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Maximum number of frontier links to claim per run
    pub batch_limit: usize,

    /// Only claim links at or below this priority (focused runs)
    pub priority_ceiling: Option<i32>,

    /// Pacing between items, expressed as items per minute
    pub items_per_minute: u32,

    /// Name recorded on audit rows
    pub scraper_name: String,

    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            batch_limit: 50,
            priority_ceiling: None,
            items_per_minute: 20,
            scraper_name: "link-follower".to_string(),
            fetch: FetchConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

impl HarvestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }

    pub fn with_priority_ceiling(mut self, ceiling: i32) -> Self {
        self.priority_ceiling = Some(ceiling);
        self
    }

    pub fn with_items_per_minute(mut self, per_minute: u32) -> Self {
        self.items_per_minute = per_minute;
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_extract(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }
}

/// Configuration for the fetch layer.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Local cache directory for downloaded documents
    pub cache_dir: PathBuf,

    /// Hard page cap for pathological documents
    pub max_pdf_pages: usize,

    /// Timeout for direct document downloads
    pub download_timeout: Duration,

    /// Timeout for rendering-service calls
    pub render_timeout: Duration,

    /// Client identity for direct downloads
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data/documents"),
            max_pdf_pages: 100,
            download_timeout: Duration::from_secs(60),
            render_timeout: Duration::from_secs(30),
            user_agent:
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
        }
    }
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_max_pdf_pages(mut self, pages: usize) -> Self {
        self.max_pdf_pages = pages;
        self
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }
}

/// Configuration for the extraction orchestrator.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Text shorter than this is not worth a reasoning call
    pub min_text_len: usize,

    /// Character budget submitted to providers; best-effort completeness
    /// over a prefix, not coverage of arbitrarily long documents
    pub text_budget: usize,

    /// Output token cap per provider call
    pub max_output_tokens: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_text_len: 200,
            text_budget: 35_000,
            max_output_tokens: 4_000,
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_text_len(mut self, len: usize) -> Self {
        self.min_text_len = len;
        self
    }

    pub fn with_text_budget(mut self, budget: usize) -> Self {
        self.text_budget = budget;
        self
    }
}
