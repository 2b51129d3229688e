//! The harvest run loop.
//!
//! Claims a batch of pending links from the frontier and walks each one
//! through fetch, ingest, extract, validate, resolve, and link discovery.
//! A link that fails is marked and skipped; only storage and
//! configuration failures abort the run.

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{HarvestError, Result};
use crate::extract::{Extractor, ProviderPool};
use crate::fetch::{Fetched, Fetcher};
use crate::frontier::{detect_jurisdiction, Frontier};
use crate::resolve::resolve_facts;
use crate::traits::{HarvestStore, PageRenderer};
use crate::types::{DiscoveredLink, HarvestConfig, SourceDocument, SourceKind, StructuredFacts};
use crate::validate::{RecordContext, Validator};

type PacingLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Counters for one harvest run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Links fetched and processed to completion
    pub scraped: usize,

    /// Links that failed and were marked with an error
    pub failed: usize,

    /// New canonical entities created
    pub entities_inserted: usize,

    /// Candidates matched to existing entities
    pub entities_linked: usize,

    /// New frontier links admitted during the run
    pub links_discovered: usize,

    /// Source documents recorded (PDF branch)
    pub documents_recorded: usize,

    /// Frontier links still pending after the run
    pub remaining_pending: usize,
}

/// End-to-end harvester: frontier in, graded entities out.
pub struct Pipeline<S, R>
where
    S: HarvestStore,
    R: PageRenderer,
{
    store: S,
    fetcher: Fetcher<R>,
    extractor: Extractor,
    validator: Validator,
    limiter: PacingLimiter,
    config: HarvestConfig,
}

impl<S, R> Pipeline<S, R>
where
    S: HarvestStore,
    R: PageRenderer,
{
    pub fn new(store: S, renderer: R, pool: ProviderPool, config: HarvestConfig) -> Result<Self> {
        let per_minute = NonZeroU32::new(config.items_per_minute)
            .ok_or_else(|| HarvestError::Config("items_per_minute must be > 0".to_string()))?;

        Ok(Self {
            store,
            fetcher: Fetcher::new(renderer, &config.fetch)?,
            extractor: Extractor::new(pool, config.extract.clone()),
            validator: Validator::new(config.scraper_name.clone()),
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
            config,
        })
    }

    /// The underlying store, for inspection after a run.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seed the frontier with starting URLs, scored and filtered like any
    /// discovered link.
    pub async fn seed(&self, urls: &[String]) -> Result<usize> {
        let frontier = Frontier::new(&self.store);
        frontier.enqueue_all(urls, "seed").await
    }

    /// Process one batch of pending links.
    ///
    /// Cancellation is checked between items; the item in flight is
    /// allowed to finish so no link is left half-ingested.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunSummary> {
        let frontier = Frontier::new(&self.store);
        let batch = frontier
            .dequeue_batch(self.config.batch_limit, self.config.priority_ceiling)
            .await?;

        info!(batch = batch.len(), "starting harvest run");
        let mut summary = RunSummary::default();

        for link in batch {
            if cancel.is_cancelled() {
                info!("run cancelled, stopping before next link");
                break;
            }
            self.limiter.until_ready().await;

            match self.process_link(&frontier, &link, &mut summary).await {
                Ok(()) => summary.scraped += 1,
                Err(HarvestError::Fetch(err)) => {
                    warn!(url = %link.url, error = %err, "failed to scrape");
                    frontier.mark_error(link.id, "Failed to scrape").await?;
                    summary.failed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        summary.remaining_pending = frontier.pending_count().await?;
        info!(
            scraped = summary.scraped,
            failed = summary.failed,
            inserted = summary.entities_inserted,
            linked = summary.entities_linked,
            discovered = summary.links_discovered,
            pending = summary.remaining_pending,
            "harvest run complete"
        );
        Ok(summary)
    }

    async fn process_link(
        &self,
        frontier: &Frontier<'_, S>,
        link: &DiscoveredLink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let jurisdiction = link
            .jurisdiction_hint
            .clone()
            .unwrap_or_else(|| detect_jurisdiction(&link.url).to_string());

        let fetched = self.fetcher.fetch(&link.url).await?;

        let ingested = self.store.upsert_content(&fetched.content).await?;
        if ingested.created {
            let document_id = self.record_document(&fetched, &jurisdiction, summary).await?;

            self.extract_and_resolve(
                &fetched,
                &jurisdiction,
                ingested.id,
                document_id,
                summary,
            )
            .await?;

            self.store.complete_content(ingested.id).await?;
        } else {
            debug!(url = %link.url, "content already ingested, skipping extraction");
        }

        summary.links_discovered += frontier.enqueue_all(&fetched.links, &link.url).await?;

        frontier.mark_scraped(link.id).await
    }

    /// Record a provenance document for the PDF branch.
    async fn record_document(
        &self,
        fetched: &Fetched,
        jurisdiction: &str,
        summary: &mut RunSummary,
    ) -> Result<Option<uuid::Uuid>> {
        if fetched.content.source_kind != SourceKind::Pdf {
            return Ok(None);
        }

        let mut document = SourceDocument::from_url(&fetched.content.source_url)
            .with_jurisdiction(jurisdiction);
        if let Some(title) = &fetched.title {
            document = document.with_title(title.clone());
        }
        if let Some(path) = &fetched.content.file_path {
            document = document.with_file_path(path.clone());
        }
        if let Some(pages) = fetched.content.page_count {
            document = document.with_page_count(pages);
        }

        let outcome = self.store.upsert_document(&document).await?;
        if outcome.created {
            summary.documents_recorded += 1;
        }
        Ok(Some(outcome.id))
    }

    async fn extract_and_resolve(
        &self,
        fetched: &Fetched,
        jurisdiction: &str,
        content_id: uuid::Uuid,
        document_id: Option<uuid::Uuid>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let facts = match self
            .extractor
            .extract(&fetched.content.body, jurisdiction)
            .await
        {
            Ok(Some(facts)) => facts,
            Ok(None) => return Ok(()),
            Err(err) => {
                warn!(url = %fetched.content.source_url, error = %err, "no facts extracted");
                return Ok(());
            }
        };

        let accepted = self
            .grade_candidates(&facts, &fetched.content.source_url, document_id.is_some())
            .await?;
        if accepted.is_empty() {
            return Ok(());
        }

        let facts = StructuredFacts {
            interventions: accepted,
            ..facts
        };
        let outcome = resolve_facts(
            &self.store,
            &facts,
            &fetched.content.source_url,
            jurisdiction,
            content_id,
            document_id,
        )
        .await?;

        summary.entities_inserted += outcome.inserted;
        summary.entities_linked += outcome.linked_existing;
        Ok(())
    }

    /// Validate every candidate, audit every verdict, keep the valid ones.
    async fn grade_candidates(
        &self,
        facts: &StructuredFacts,
        source_url: &str,
        has_document: bool,
    ) -> Result<Vec<crate::types::CandidateIntervention>> {
        let mut ctx = RecordContext::new(source_url).with_source_date(chrono::Utc::now());
        if has_document {
            ctx = ctx.with_source_document();
        }

        let mut accepted = Vec::new();
        for candidate in &facts.interventions {
            let record = serde_json::to_value(candidate)?;
            let validation = self.validator.validate(&record, &ctx);
            let audit = self
                .validator
                .audit(&record, &validation, &ctx, "intervention");
            self.store.append_audit(&audit).await?;

            if validation.valid {
                accepted.push(candidate.clone());
            } else {
                warn!(
                    name = %candidate.name,
                    score = validation.score,
                    issues = ?validation.issues,
                    "candidate rejected by validation"
                );
            }
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::{MockProvider, MockRenderer};
    use crate::traits::{AuditStore, EntityStore, LinkStore};
    use crate::types::LinkStatus;

    fn facts_json() -> &'static str {
        r#"{
            "interventions": [{
                "name": "Youth Koori Court",
                "type": "Diversion",
                "description": "Culturally adapted court process for young Aboriginal people.",
                "geography": ["NSW"]
            }]
        }"#
    }

    fn test_config() -> HarvestConfig {
        HarvestConfig::new().with_items_per_minute(6_000)
    }

    // inserts directly, bypassing relevance scoring, so tests control
    // the frontier contents exactly
    async fn seeded_store(url: &str, priority: i32) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_link(&DiscoveredLink::new(url, "seed", priority))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_run_fetches_extracts_and_inserts() {
        let url = "https://www.aihw.gov.au/youth-justice-programs";
        let store = seeded_store(url, 10).await;
        let renderer = MockRenderer::new().with_page(
            url,
            "A long report about youth justice diversion programs. ".repeat(20),
            vec!["https://www.aihw.gov.au/youth-detention-data".to_string()],
        );
        let pool = ProviderPool::new()
            .with_provider(MockProvider::new("mock").with_response(facts_json()));

        let pipeline = Pipeline::new(store, renderer, pool, test_config()).unwrap();
        let summary = pipeline.run(CancellationToken::new()).await.unwrap();

        assert_eq!(summary.scraped, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.entities_inserted, 1);
        assert_eq!(summary.links_discovered, 1);
        assert_eq!(summary.remaining_pending, 1);
        assert_eq!(pipeline.store.count_interventions().await.unwrap(), 1);
        assert_eq!(pipeline.store.count_audits().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_marks_link_and_continues() {
        let bad = "https://www.example.gov.au/broken";
        let good = "https://www.aihw.gov.au/working";
        let store = seeded_store(bad, 10).await;
        store
            .insert_link(&DiscoveredLink::new(good, "seed", 5))
            .await
            .unwrap();

        // only the good page is seeded in the renderer
        let renderer = MockRenderer::new().with_page(
            good,
            "A long report about youth justice diversion programs. ".repeat(20),
            vec![],
        );
        let pool = ProviderPool::new()
            .with_provider(MockProvider::new("mock").with_response("{}"));

        let pipeline = Pipeline::new(store, renderer, pool, test_config()).unwrap();
        let summary = pipeline.run(CancellationToken::new()).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.scraped, 1);

        let failed = pipeline.store.link_by_url(bad).unwrap();
        assert_eq!(failed.status, LinkStatus::Error);
        assert_eq!(failed.error_message.as_deref(), Some("Failed to scrape"));
    }

    #[tokio::test]
    async fn test_duplicate_content_skips_extraction() {
        let first = "https://www.aihw.gov.au/report";
        let second = "https://www.aihw.gov.au/report-mirror";
        let store = seeded_store(first, 10).await;
        store
            .insert_link(&DiscoveredLink::new(second, "seed", 10))
            .await
            .unwrap();

        let body = "Identical mirrored report body about youth diversion. ".repeat(20);
        let renderer = MockRenderer::new()
            .with_page(first, body.clone(), vec![])
            .with_page(second, body, vec![]);
        let provider = MockProvider::new("mock").with_response(facts_json());
        let calls = provider.calls();
        let pool = ProviderPool::new().with_provider(provider);

        let pipeline = Pipeline::new(store, renderer, pool, test_config()).unwrap();
        let summary = pipeline.run(CancellationToken::new()).await.unwrap();

        // both links scraped, but the identical body is only extracted once
        assert_eq!(summary.scraped, 2);
        assert_eq!(calls.count(), 1);
        assert_eq!(pipeline.store.content_count(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_stops_between_items() {
        let store = seeded_store("https://a.gov.au/one", 10).await;
        store
            .insert_link(&DiscoveredLink::new("https://a.gov.au/two", "seed", 5))
            .await
            .unwrap();

        let renderer = MockRenderer::new();
        let pool = ProviderPool::new()
            .with_provider(MockProvider::new("mock").with_response("{}"));
        let pipeline = Pipeline::new(store, renderer, pool, test_config()).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = pipeline.run(cancel).await.unwrap();

        assert_eq!(summary.scraped + summary.failed, 0);
        assert_eq!(summary.remaining_pending, 2);
    }

    #[tokio::test]
    async fn test_placeholder_candidate_is_rejected_but_audited() {
        let url = "https://www.aihw.gov.au/draft-page";
        let store = seeded_store(url, 10).await;
        let renderer = MockRenderer::new().with_page(
            url,
            "A long draft report about youth justice programs. ".repeat(20),
            vec![],
        );
        let pool = ProviderPool::new().with_provider(
            MockProvider::new("mock").with_response(
                r#"{"interventions": [{
                    "name": "Lorem Ipsum Program",
                    "type": "Diversion",
                    "description": "Placeholder description, to be confirmed."
                }]}"#,
            ),
        );

        let pipeline = Pipeline::new(store, renderer, pool, test_config()).unwrap();
        let summary = pipeline.run(CancellationToken::new()).await.unwrap();

        assert_eq!(summary.entities_inserted, 0);
        assert_eq!(pipeline.store.count_interventions().await.unwrap(), 0);
        // rejection still leaves an audit row
        assert_eq!(pipeline.store.count_audits().await.unwrap(), 1);
    }
}
