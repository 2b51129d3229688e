//! Typed errors for the harvesting pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. The variants mirror the
//! pipeline's failure taxonomy: transient fetch/provider failures are
//! recovered per item, configuration failures terminate the run.

use thiserror::Error;

/// Errors that can occur during pipeline operations.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A fetch operation failed (recoverable per link)
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A reasoning provider failed (recoverable per document)
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error; the run cannot make progress at all
    #[error("config error: {0}")]
    Config(String),
}

impl HarvestError {
    /// Wrap an arbitrary storage backend error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }

    /// Build a storage error from a message.
    pub fn storage_msg(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into().into())
    }
}

/// Errors that can occur while fetching a single link.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL scheme cannot be fetched (mailto:, tel:, ftp:, ...)
    #[error("unsupported scheme: {url}")]
    UnsupportedScheme { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Timeout while fetching or rendering
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// The fetch succeeded but returned no usable text
    #[error("empty content: {url}")]
    EmptyContent { url: String },

    /// PDF bytes could not be rendered to text
    #[error("PDF parse error for {url}: {message}")]
    PdfParse { url: String, message: String },

    /// Local cache file operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering service returned an error
    #[error("render error: {0}")]
    Render(String),
}

impl FetchError {
    /// Wrap an HTTP client error.
    pub fn http(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Http(Box::new(err))
    }

    /// Build an HTTP error from a message (non-2xx status, missing body).
    pub fn http_msg(msg: impl Into<String>) -> Self {
        Self::Http(msg.into().into())
    }
}

/// Errors from reasoning providers.
///
/// The two-class contract matters: `Capacity` failures trip the circuit
/// breaker and advance to the next provider within the same call; every
/// other class propagates immediately.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credits/quota/rate-limit class of failure (transient capacity)
    #[error("{provider} over capacity: {message}")]
    Capacity { provider: String, message: String },

    /// Any other provider failure (non-recoverable for this call)
    #[error("{provider} error: {message}")]
    Api { provider: String, message: String },

    /// Every provider in the pool is at its failure ceiling
    #[error("all reasoning providers exhausted")]
    Exhausted,
}

impl ProviderError {
    /// True for the capacity/quota class that triggers failover.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. })
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
