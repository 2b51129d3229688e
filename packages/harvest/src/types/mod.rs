//! Domain types for the harvesting pipeline.

pub mod audit;
pub mod config;
pub mod content;
pub mod document;
pub mod entity;
pub mod facts;
pub mod link;

pub use audit::{fingerprint, AuditRecord, Grade, Validation};
pub use config::{ExtractConfig, FetchConfig, HarvestConfig};
pub use content::{hash_text, ProcessingStatus, RawContent, SourceKind};
pub use document::{organization_from_url, AuthorityLevel, DocumentType, SourceDocument};
pub use entity::{ContentEntity, EntitySource, Intervention, ReviewStatus};
pub use facts::{
    CandidateIntervention, FundingMention, InquiryRecommendation, LegalCase, ResearchFinding,
    StatisticFact, StructuredFacts,
};
pub use link::{DiscoveredLink, LinkStatus};
