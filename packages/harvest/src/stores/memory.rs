//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::{
    AuditStore, ContentStore, DocumentStore, EntityStore, LinkStore, UpsertOutcome,
};
use crate::types::{
    AuditRecord, ContentEntity, DiscoveredLink, EntitySource, Intervention, LinkStatus,
    ProcessingStatus, RawContent, SourceDocument,
};

/// In-memory store backing every storage trait.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    links: RwLock<Vec<DiscoveredLink>>,
    content: RwLock<Vec<RawContent>>,
    documents: RwLock<Vec<SourceDocument>>,
    interventions: RwLock<Vec<Intervention>>,
    entity_sources: RwLock<HashMap<(String, Uuid, Uuid), EntitySource>>,
    content_entities: RwLock<HashMap<(Uuid, String, Uuid), ContentEntity>>,
    audits: RwLock<Vec<AuditRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            links: RwLock::new(Vec::new()),
            content: RwLock::new(Vec::new()),
            documents: RwLock::new(Vec::new()),
            interventions: RwLock::new(Vec::new()),
            entity_sources: RwLock::new(HashMap::new()),
            content_entities: RwLock::new(HashMap::new()),
            audits: RwLock::new(Vec::new()),
        }
    }

    /// Number of provenance edges, both kinds.
    pub fn edge_count(&self) -> usize {
        self.entity_sources.read().unwrap().len() + self.content_entities.read().unwrap().len()
    }

    pub fn entity_source_count(&self) -> usize {
        self.entity_sources.read().unwrap().len()
    }

    pub fn content_entity_count(&self) -> usize {
        self.content_entities.read().unwrap().len()
    }

    pub fn content_count(&self) -> usize {
        self.content.read().unwrap().len()
    }

    pub fn link_count(&self) -> usize {
        self.links.read().unwrap().len()
    }

    /// Snapshot a link by URL.
    pub fn link_by_url(&self, url: &str) -> Option<DiscoveredLink> {
        self.links
            .read()
            .unwrap()
            .iter()
            .find(|l| l.url == url)
            .cloned()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn insert_link(&self, link: &DiscoveredLink) -> Result<bool> {
        let mut links = self.links.write().unwrap();
        if links.iter().any(|existing| existing.url == link.url) {
            return Ok(false);
        }
        links.push(link.clone());
        Ok(true)
    }

    async fn pending_batch(
        &self,
        limit: usize,
        priority_ceiling: Option<i32>,
    ) -> Result<Vec<DiscoveredLink>> {
        let links = self.links.read().unwrap();
        let mut pending: Vec<DiscoveredLink> = links
            .iter()
            .filter(|l| l.status == LinkStatus::Pending)
            .filter(|l| priority_ceiling.map_or(true, |ceiling| l.priority <= ceiling))
            .cloned()
            .collect();

        // stable sort keeps discovery order within a priority tier
        pending.sort_by(|a, b| b.priority.cmp(&a.priority));
        pending.truncate(limit);
        Ok(pending)
    }

    async fn mark_link(&self, id: Uuid, status: LinkStatus, error: Option<String>) -> Result<()> {
        let mut links = self.links.write().unwrap();
        if let Some(link) = links
            .iter_mut()
            .find(|l| l.id == id && l.status == LinkStatus::Pending)
        {
            link.status = status;
            link.error_message = error;
            link.scraped_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn count_pending(&self) -> Result<usize> {
        Ok(self
            .links
            .read()
            .unwrap()
            .iter()
            .filter(|l| l.status == LinkStatus::Pending)
            .count())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn upsert_content(&self, content: &RawContent) -> Result<UpsertOutcome> {
        let mut rows = self.content.write().unwrap();
        if let Some(existing) = rows.iter().find(|c| c.content_hash == content.content_hash) {
            return Ok(UpsertOutcome {
                id: existing.id,
                created: false,
            });
        }
        rows.push(content.clone());
        Ok(UpsertOutcome {
            id: content.id,
            created: true,
        })
    }

    async fn get_content(&self, id: Uuid) -> Result<Option<RawContent>> {
        Ok(self
            .content
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn complete_content(&self, id: Uuid) -> Result<()> {
        let mut rows = self.content.write().unwrap();
        if let Some(row) = rows.iter_mut().find(|c| c.id == id) {
            row.processing_status = ProcessingStatus::Completed;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert_document(&self, document: &SourceDocument) -> Result<UpsertOutcome> {
        let mut docs = self.documents.write().unwrap();
        if let Some(existing) = docs.iter().find(|d| d.source_url == document.source_url) {
            return Ok(UpsertOutcome {
                id: existing.id,
                created: false,
            });
        }
        docs.push(document.clone());
        Ok(UpsertOutcome {
            id: document.id,
            created: true,
        })
    }

    async fn get_document_by_url(&self, url: &str) -> Result<Option<SourceDocument>> {
        Ok(self
            .documents
            .read()
            .unwrap()
            .iter()
            .find(|d| d.source_url == url)
            .cloned())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_intervention_by_name(&self, name: &str) -> Result<Option<Intervention>> {
        Ok(self
            .interventions
            .read()
            .unwrap()
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn insert_intervention(&self, intervention: &Intervention) -> Result<()> {
        self.interventions.write().unwrap().push(intervention.clone());
        Ok(())
    }

    async fn upsert_entity_source(&self, edge: &EntitySource) -> Result<()> {
        let key = (
            edge.entity_type.clone(),
            edge.entity_id,
            edge.source_document_id,
        );
        self.entity_sources.write().unwrap().insert(key, edge.clone());
        Ok(())
    }

    async fn upsert_content_entity(&self, edge: &ContentEntity) -> Result<()> {
        let key = (
            edge.raw_content_id,
            edge.entity_type.clone(),
            edge.entity_id,
        );
        self.content_entities.write().unwrap().insert(key, edge.clone());
        Ok(())
    }

    async fn count_interventions(&self) -> Result<usize> {
        Ok(self.interventions.read().unwrap().len())
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append_audit(&self, record: &AuditRecord) -> Result<()> {
        self.audits.write().unwrap().push(record.clone());
        Ok(())
    }

    async fn count_audits(&self) -> Result<usize> {
        Ok(self.audits.read().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_url_not_inserted_twice() {
        let store = MemoryStore::new();
        let link = DiscoveredLink::new("https://a.gov.au/x", "seed", 5);

        assert!(store.insert_link(&link).await.unwrap());
        let again = DiscoveredLink::new("https://a.gov.au/x", "other-page", 10);
        assert!(!store.insert_link(&again).await.unwrap());
        assert_eq!(store.link_count(), 1);
    }

    #[tokio::test]
    async fn pending_batch_ordered_by_priority_desc() {
        let store = MemoryStore::new();
        for (url, priority) in [
            ("https://a.gov.au/low", 1),
            ("https://a.gov.au/high", 10),
            ("https://a.gov.au/mid", 5),
        ] {
            store
                .insert_link(&DiscoveredLink::new(url, "seed", priority))
                .await
                .unwrap();
        }

        let batch = store.pending_batch(10, None).await.unwrap();
        let priorities: Vec<i32> = batch.iter().map(|l| l.priority).collect();
        assert_eq!(priorities, vec![10, 5, 1]);
    }

    #[tokio::test]
    async fn priority_ceiling_filters_batch() {
        let store = MemoryStore::new();
        for (url, priority) in [("https://a.gov.au/p10", 10), ("https://a.gov.au/p5", 5)] {
            store
                .insert_link(&DiscoveredLink::new(url, "seed", priority))
                .await
                .unwrap();
        }

        let batch = store.pending_batch(10, Some(5)).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].priority, 5);
    }

    #[tokio::test]
    async fn mark_link_is_pending_only() {
        let store = MemoryStore::new();
        let link = DiscoveredLink::new("https://a.gov.au/x", "seed", 5);
        store.insert_link(&link).await.unwrap();

        store
            .mark_link(link.id, LinkStatus::Scraped, None)
            .await
            .unwrap();
        // terminal: a second transition is a no-op
        store
            .mark_link(link.id, LinkStatus::Error, Some("late".into()))
            .await
            .unwrap();

        let stored = store.link_by_url("https://a.gov.au/x").unwrap();
        assert_eq!(stored.status, LinkStatus::Scraped);
        assert!(stored.error_message.is_none());
        assert!(stored.scraped_at.is_some());
    }

    #[tokio::test]
    async fn content_upsert_dedups_by_hash() {
        let store = MemoryStore::new();
        let first = RawContent::new(
            "https://a.gov.au/x",
            crate::types::SourceKind::Webpage,
            "identical body",
            "firecrawl",
        );
        let second = RawContent::new(
            "https://a.gov.au/y",
            crate::types::SourceKind::Webpage,
            "identical body",
            "firecrawl",
        );

        let one = store.upsert_content(&first).await.unwrap();
        let two = store.upsert_content(&second).await.unwrap();

        assert!(one.created);
        assert!(!two.created);
        assert_eq!(one.id, two.id);
        assert_eq!(store.content_count(), 1);
    }

    #[tokio::test]
    async fn name_lookup_is_case_insensitive() {
        let store = MemoryStore::new();
        let entity = Intervention::new(
            "Youth Koori Court",
            "desc",
            "Diversion",
            "https://a.gov.au",
        );
        store.insert_intervention(&entity).await.unwrap();

        let found = store
            .find_intervention_by_name("YOUTH KOORI COURT")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, entity.id);
        assert!(store
            .find_intervention_by_name("Other Program")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn entity_source_upsert_is_idempotent() {
        let store = MemoryStore::new();
        let entity_id = Uuid::new_v4();
        let doc_id = Uuid::new_v4();

        let edge = EntitySource::new("intervention", entity_id, doc_id);
        store.upsert_entity_source(&edge).await.unwrap();
        store.upsert_entity_source(&edge).await.unwrap();

        assert_eq!(store.entity_source_count(), 1);
    }
}
