//! Autonomous Research-Harvesting Pipeline
//!
//! Crawls a frontier of discovered links, fetches webpages and PDF
//! documents, extracts structured facts with a pool of reasoning
//! providers, resolves candidates against a canonical entity store, and
//! grades every record before it is admitted.
//!
//! # Design Philosophy
//!
//! **"Admit nothing you cannot cite"**
//!
//! - Relevance-gated frontier: only links worth fetching are queued
//! - Content-addressed ingestion: identical bodies are processed once
//! - Provider failover with a per-run circuit breaker
//! - Every admitted entity carries provenance edges back to its sources
//! - Every accept/reject decision leaves an immutable audit row
//!
//! # Usage
//!
//! ```rust,ignore
//! use harvest::{HarvestConfig, MemoryStore, Pipeline, ProviderPool};
//! use harvest::fetch::FirecrawlRenderer;
//! use tokio_util::sync::CancellationToken;
//!
//! let store = MemoryStore::new();
//! let renderer = FirecrawlRenderer::from_env()?;
//! let pool = ProviderPool::from_env();
//!
//! let pipeline = Pipeline::new(store, renderer, pool, HarvestConfig::default())?;
//! pipeline.seed(&["https://www.aihw.gov.au/youth-justice".to_string()]).await?;
//! let summary = pipeline.run(CancellationToken::new()).await?;
//! println!("{} entities from {} pages", summary.entities_inserted, summary.scraped);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (stores, PageRenderer, ReasoningProvider)
//! - [`types`] - Domain data types and configuration
//! - [`frontier`] - Link discovery, relevance scoring, batch claiming
//! - [`fetch`] - URL classification, page rendering, local PDF parsing
//! - [`extract`] - Prompt construction and the provider failover pool
//! - [`resolve`] - Entity resolution and provenance edges
//! - [`validate`] - Record grading and the audit trail
//! - [`pipeline`] - The run loop tying it all together
//! - [`stores`] - Storage implementations (memory, sqlite)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod pipeline;
pub mod resolve;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export core types at crate root
pub use error::{FetchError, HarvestError, ProviderError, Result};
pub use extract::{Extractor, ProviderPool};
pub use fetch::Fetcher;
pub use frontier::Frontier;
pub use pipeline::{Pipeline, RunSummary};
pub use stores::MemoryStore;
#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;
pub use traits::{HarvestStore, PageRenderer, ReasoningProvider};
pub use types::HarvestConfig;
pub use validate::Validator;
