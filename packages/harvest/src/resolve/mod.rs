//! Entity resolution: dedup candidate facts and record provenance.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::traits::EntityStore;
use crate::types::{ContentEntity, EntitySource, Intervention, StructuredFacts};

/// What one resolution pass did.
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    /// New canonical entities created
    pub inserted: usize,

    /// Candidates matched to an existing entity (citation added instead)
    pub linked_existing: usize,

    /// Ids of every entity touched, new or existing
    pub entity_ids: Vec<Uuid>,
}

/// Resolve extracted candidate facts against the canonical store.
///
/// Matching is exact case-insensitive on name. A match means "same
/// entity, new citation"; the candidate is discarded and a provenance
/// edge is added to the existing entity instead. No match means a new
/// entity with safe governance defaults.
///
/// Each candidate is independently fallible: one failed insert is
/// logged and skipped, never aborting the rest of the batch.
pub async fn resolve_facts<S: EntityStore>(
    store: &S,
    facts: &StructuredFacts,
    source_url: &str,
    jurisdiction: &str,
    raw_content_id: Uuid,
    source_document_id: Option<Uuid>,
) -> Result<ResolveOutcome> {
    let mut outcome = ResolveOutcome::default();

    for candidate in &facts.interventions {
        match resolve_one(
            store,
            candidate,
            source_url,
            jurisdiction,
            raw_content_id,
            source_document_id,
        )
        .await
        {
            Ok(Resolved::Inserted(id)) => {
                outcome.inserted += 1;
                outcome.entity_ids.push(id);
                info!(name = %candidate.name, "inserted intervention");
            }
            Ok(Resolved::LinkedExisting(id)) => {
                outcome.linked_existing += 1;
                outcome.entity_ids.push(id);
                debug!(name = %candidate.name, "linked existing intervention");
            }
            Err(err) => {
                warn!(name = %candidate.name, %err, "failed to resolve candidate, skipping");
            }
        }
    }

    Ok(outcome)
}

enum Resolved {
    Inserted(Uuid),
    LinkedExisting(Uuid),
}

async fn resolve_one<S: EntityStore>(
    store: &S,
    candidate: &crate::types::CandidateIntervention,
    source_url: &str,
    jurisdiction: &str,
    raw_content_id: Uuid,
    source_document_id: Option<Uuid>,
) -> Result<Resolved> {
    if let Some(existing) = store.find_intervention_by_name(&candidate.name).await? {
        if let Some(doc_id) = source_document_id {
            let edge = EntitySource::new("intervention", existing.id, doc_id)
                .with_citation_context(format!("Found in {source_url}"));
            store.upsert_entity_source(&edge).await?;
        }
        return Ok(Resolved::LinkedExisting(existing.id));
    }

    let geography = if candidate.geography.is_empty() {
        vec![jurisdiction.to_string()]
    } else {
        candidate.geography.clone()
    };
    let target_cohort = if candidate.target_cohort.is_empty() {
        vec!["Young people aged 10-17".to_string()]
    } else {
        candidate.target_cohort.clone()
    };

    let entity = Intervention::new(
        &candidate.name,
        &candidate.description,
        &candidate.kind,
        source_url,
    )
    .with_geography(geography)
    .with_target_cohort(target_cohort);

    store.insert_intervention(&entity).await?;

    store
        .upsert_content_entity(&ContentEntity::new(
            raw_content_id,
            "intervention",
            entity.id,
        ))
        .await?;

    if let Some(doc_id) = source_document_id {
        let edge = EntitySource::new("intervention", entity.id, doc_id)
            .with_citation_context(format!("Extracted from {source_url}"));
        store.upsert_entity_source(&edge).await?;
    }

    Ok(Resolved::Inserted(entity.id))
}
