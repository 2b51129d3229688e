//! Storage traits for the persisted stores the pipeline resumes from.
//!
//! The storage layer is split into focused traits:
//! - `LinkStore`: the frontier table
//! - `ContentStore`: content-addressed raw content
//! - `DocumentStore`: citable source documents
//! - `EntityStore`: canonical entities and provenance edges
//! - `AuditStore`: the append-only audit trail
//! - `HarvestStore`: composite trait combining all five

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{
    AuditRecord, ContentEntity, DiscoveredLink, EntitySource, Intervention, LinkStatus,
    RawContent, SourceDocument,
};

/// Outcome of a conditional upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Id of the row the caller should reference (existing or new)
    pub id: Uuid,

    /// True when the call inserted a new row
    pub created: bool,
}

/// The frontier table.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a link if its URL is not already present.
    ///
    /// Returns false when the URL already exists (by exact match).
    async fn insert_link(&self, link: &DiscoveredLink) -> Result<bool>;

    /// Claim pending links ordered by priority descending, ties broken by
    /// discovery order. `priority_ceiling` restricts the claim to links at
    /// or below that priority (focused runs).
    async fn pending_batch(
        &self,
        limit: usize,
        priority_ceiling: Option<i32>,
    ) -> Result<Vec<DiscoveredLink>>;

    /// Apply a terminal status transition. Only `pending` links move; a
    /// link already in a terminal state is left untouched.
    async fn mark_link(&self, id: Uuid, status: LinkStatus, error: Option<String>) -> Result<()>;

    /// Number of links still pending.
    async fn count_pending(&self) -> Result<usize>;
}

/// Content-addressed raw content archive.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert content unless its `content_hash` is already stored.
    ///
    /// Check-then-insert is a single conditional upsert so concurrent
    /// fetches of identical bytes cannot produce duplicate rows.
    async fn upsert_content(&self, content: &RawContent) -> Result<UpsertOutcome>;

    async fn get_content(&self, id: Uuid) -> Result<Option<RawContent>>;

    /// Mark a content row's processing as completed.
    async fn complete_content(&self, id: Uuid) -> Result<()>;
}

/// Citable source documents, one per unique URL.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document unless its `source_url` is already stored.
    async fn upsert_document(&self, document: &SourceDocument) -> Result<UpsertOutcome>;

    async fn get_document_by_url(&self, url: &str) -> Result<Option<SourceDocument>>;
}

/// Canonical entities and their provenance edges.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Exact case-insensitive name lookup; the dedup seam.
    async fn find_intervention_by_name(&self, name: &str) -> Result<Option<Intervention>>;

    async fn insert_intervention(&self, intervention: &Intervention) -> Result<()>;

    /// Upsert keyed by `(entity_type, entity_id, source_document_id)`.
    async fn upsert_entity_source(&self, edge: &EntitySource) -> Result<()>;

    /// Upsert keyed by `(raw_content_id, entity_type, entity_id)`.
    async fn upsert_content_entity(&self, edge: &ContentEntity) -> Result<()>;

    async fn count_interventions(&self) -> Result<usize>;
}

/// Append-only audit trail; rows are never mutated.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append_audit(&self, record: &AuditRecord) -> Result<()>;

    async fn count_audits(&self) -> Result<usize>;
}

/// Composite storage trait used by the pipeline.
pub trait HarvestStore:
    LinkStore + ContentStore + DocumentStore + EntityStore + AuditStore
{
}

// Blanket implementation: anything implementing all five traits is a HarvestStore
impl<T: LinkStore + ContentStore + DocumentStore + EntityStore + AuditStore> HarvestStore for T {}
