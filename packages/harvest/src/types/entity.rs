//! Canonical entities and their provenance edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Curation state of a canonical entity.
///
/// Ordered: review status only ever advances. `advance_to` is the sole
/// mutator and ignores backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Reviewed,
    Approved,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Advance to `next` if it is a forward transition; otherwise keep the
    /// current status. Regression never happens implicitly.
    pub fn advance_to(self, next: ReviewStatus) -> ReviewStatus {
        if next > self {
            next
        } else {
            self
        }
    }
}

/// A canonical intervention record, deduplicated across sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    pub id: Uuid,

    /// Dedup key (matched case-insensitively)
    pub name: String,

    pub description: String,

    /// Program category ("Prevention", "Diversion", "Cultural Connection", ...)
    pub kind: String,

    pub geography: Vec<String>,
    pub target_cohort: Vec<String>,

    /// Data-governance fields, defaulted safely on insert
    pub consent_level: String,
    pub review_status: ReviewStatus,
    pub permitted_uses: Vec<String>,

    pub source_url: String,
    pub source_date: DateTime<Utc>,
}

impl Intervention {
    /// Default consent level applied to newly harvested entities.
    pub const DEFAULT_CONSENT_LEVEL: &'static str = "Public Knowledge Commons";

    /// Default permitted use applied to newly harvested entities.
    pub const DEFAULT_PERMITTED_USE: &'static str = "Query (internal)";

    /// Create an intervention with safe governance defaults.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            kind: kind.into(),
            geography: Vec::new(),
            target_cohort: Vec::new(),
            consent_level: Self::DEFAULT_CONSENT_LEVEL.to_string(),
            review_status: ReviewStatus::Approved,
            permitted_uses: vec![Self::DEFAULT_PERMITTED_USE.to_string()],
            source_url: source_url.into(),
            source_date: Utc::now(),
        }
    }

    pub fn with_geography(mut self, geography: Vec<String>) -> Self {
        self.geography = geography;
        self
    }

    pub fn with_target_cohort(mut self, cohort: Vec<String>) -> Self {
        self.target_cohort = cohort;
        self
    }
}

/// Provenance edge: a document attests an entity.
///
/// Unique per `(entity_type, entity_id, source_document_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySource {
    pub entity_type: String,
    pub entity_id: Uuid,
    pub source_document_id: Uuid,
    pub page_numbers: Option<String>,
    pub section_reference: Option<String>,
    pub citation_context: Option<String>,
}

impl EntitySource {
    pub fn new(entity_type: impl Into<String>, entity_id: Uuid, source_document_id: Uuid) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
            source_document_id,
            page_numbers: None,
            section_reference: None,
            citation_context: None,
        }
    }

    pub fn with_citation_context(mut self, context: impl Into<String>) -> Self {
        self.citation_context = Some(context.into());
        self
    }
}

/// Extraction edge: a specific extraction run produced an entity.
///
/// Unique per `(raw_content_id, entity_type, entity_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntity {
    pub raw_content_id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub extraction_method: String,
    pub extraction_confidence: f32,
}

impl ContentEntity {
    pub fn new(raw_content_id: Uuid, entity_type: impl Into<String>, entity_id: Uuid) -> Self {
        Self {
            raw_content_id,
            entity_type: entity_type.into(),
            entity_id,
            extraction_method: "ai".to_string(),
            extraction_confidence: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status_only_advances() {
        assert_eq!(
            ReviewStatus::Pending.advance_to(ReviewStatus::Approved),
            ReviewStatus::Approved
        );
        assert_eq!(
            ReviewStatus::Approved.advance_to(ReviewStatus::Pending),
            ReviewStatus::Approved
        );
        assert_eq!(
            ReviewStatus::Reviewed.advance_to(ReviewStatus::Reviewed),
            ReviewStatus::Reviewed
        );
    }

    #[test]
    fn test_intervention_governance_defaults() {
        let entity = Intervention::new(
            "Youth Diversion Program",
            "Community-led diversion",
            "Diversion",
            "https://example.gov.au",
        );
        assert_eq!(entity.consent_level, Intervention::DEFAULT_CONSENT_LEVEL);
        assert_eq!(entity.review_status, ReviewStatus::Approved);
        assert_eq!(
            entity.permitted_uses,
            vec![Intervention::DEFAULT_PERMITTED_USE.to_string()]
        );
    }
}
