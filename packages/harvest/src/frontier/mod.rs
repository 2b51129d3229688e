//! Link frontier: discovery, relevance-gated admission, batch claiming.

mod relevance;

pub use relevance::{detect_jurisdiction, relevance_score, MIN_RELEVANCE};

use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::fetch::{classify_url, UrlKind};
use crate::traits::LinkStore;
use crate::types::{DiscoveredLink, LinkStatus};

/// Outcome of offering a URL to the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Admitted as a new pending link with the given priority
    Admitted(i32),

    /// Scored below the relevance threshold
    BelowThreshold(i32),

    /// URL already known to the frontier
    Duplicate,

    /// Not fetchable over HTTP (mailto:, tel:, fragments)
    Unfetchable,
}

/// The frontier over a [`LinkStore`].
///
/// Admission is relevance-gated: URLs scoring below [`MIN_RELEVANCE`]
/// are dropped without touching the store, so the frontier only ever
/// holds links worth fetching.
pub struct Frontier<'a, S: LinkStore> {
    store: &'a S,
}

impl<'a, S: LinkStore> Frontier<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Offer one URL discovered on `source_url`.
    ///
    /// Non-HTTP schemes are rejected before scoring; the frontier never
    /// holds a link the fetcher cannot open.
    pub async fn enqueue(&self, url: &str, source_url: &str) -> Result<EnqueueOutcome> {
        if classify_url(url) == UrlKind::Unfetchable {
            return Ok(EnqueueOutcome::Unfetchable);
        }

        let priority = relevance_score(url);
        if priority < MIN_RELEVANCE {
            return Ok(EnqueueOutcome::BelowThreshold(priority));
        }

        let link = DiscoveredLink::new(url, source_url, priority)
            .with_jurisdiction(detect_jurisdiction(url));

        if self.store.insert_link(&link).await? {
            debug!(url, priority, "link admitted to frontier");
            Ok(EnqueueOutcome::Admitted(priority))
        } else {
            Ok(EnqueueOutcome::Duplicate)
        }
    }

    /// Offer every URL found on a page; returns how many were admitted.
    pub async fn enqueue_all<I>(&self, urls: I, source_url: &str) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut admitted = 0;
        for url in urls {
            if matches!(
                self.enqueue(url.as_ref(), source_url).await?,
                EnqueueOutcome::Admitted(_)
            ) {
                admitted += 1;
            }
        }
        Ok(admitted)
    }

    /// Claim up to `limit` pending links, highest priority first.
    pub async fn dequeue_batch(
        &self,
        limit: usize,
        priority_ceiling: Option<i32>,
    ) -> Result<Vec<DiscoveredLink>> {
        self.store.pending_batch(limit, priority_ceiling).await
    }

    pub async fn mark_scraped(&self, id: Uuid) -> Result<()> {
        self.store.mark_link(id, LinkStatus::Scraped, None).await
    }

    pub async fn mark_error(&self, id: Uuid, message: impl Into<String>) -> Result<()> {
        self.store
            .mark_link(id, LinkStatus::Error, Some(message.into()))
            .await
    }

    pub async fn pending_count(&self) -> Result<usize> {
        self.store.count_pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    #[tokio::test]
    async fn test_non_http_schemes_rejected_before_scoring() {
        let store = MemoryStore::new();
        let frontier = Frontier::new(&store);

        // Keyword-bearing, but no scheme the fetcher can open.
        for url in [
            "mailto:youth-justice@justice.vic.gov.au",
            "tel:+61212345678",
            "javascript:void(0)",
            "#youth-justice",
        ] {
            assert_eq!(
                frontier.enqueue(url, "https://example.gov.au").await.unwrap(),
                EnqueueOutcome::Unfetchable
            );
        }

        assert_eq!(frontier.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_admission_then_duplicate() {
        let store = MemoryStore::new();
        let frontier = Frontier::new(&store);
        let url = "https://justice.vic.gov.au/youth-justice-review";

        assert_eq!(
            frontier.enqueue(url, "https://example.gov.au").await.unwrap(),
            EnqueueOutcome::Admitted(10)
        );
        assert_eq!(
            frontier.enqueue(url, "https://example.gov.au").await.unwrap(),
            EnqueueOutcome::Duplicate
        );
    }
}
