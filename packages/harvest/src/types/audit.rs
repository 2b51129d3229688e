//! Validation outcomes and the append-only audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Letter grade summarizing a validation score for human triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a 0-100 score to a grade by descending threshold bands.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Self::A,
            75..=89 => Self::B,
            60..=74 => Self::C,
            40..=59 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

/// Result of scoring one inbound record against the trust rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validation {
    /// False when the score falls below the D threshold, or when an
    /// integrity rule force-failed the record regardless of score.
    pub valid: bool,

    /// 0-100 after penalties
    pub score: u8,

    /// Human-readable description of each failed rule
    pub issues: Vec<String>,

    pub grade: Grade,
}

/// One immutable audit row per validated ingestion event.
///
/// Produced for failed records too, so systemic data-quality issues stay
/// observable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,

    /// SHA-256 digest of the normalized record
    pub data_fingerprint: String,

    pub source_url: Option<String>,
    pub score: u8,
    pub grade: Grade,
    pub issues: Vec<String>,

    /// Which harvester produced the record
    pub scraper_name: String,

    /// Record kind ("intervention", ...)
    pub data_type: String,
}

impl AuditRecord {
    /// Build an audit record from a validation outcome. Never fails: it
    /// only formats and hashes its inputs.
    pub fn new(
        record: &serde_json::Value,
        validation: &Validation,
        source_url: Option<String>,
        scraper_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            data_fingerprint: fingerprint(record),
            source_url,
            score: validation.score,
            grade: validation.grade,
            issues: validation.issues.clone(),
            scraper_name: scraper_name.into(),
            data_type: data_type.into(),
        }
    }
}

/// SHA-256 hex digest of a record's canonical JSON form.
pub fn fingerprint(record: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
