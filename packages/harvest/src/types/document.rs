//! Source documents - citable, human-meaningful publications.
//!
//! Distinct from `RawContent` (the bytes): a `SourceDocument` is the thing
//! a citation points at. Document type, publishing organization, and
//! authority level are all inferred from URL shape, the same heuristics the
//! curation team applies by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of publication, detected from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    AnnualReport,
    BudgetPaper,
    InquiryReport,
    EvaluationReport,
    PolicyDocument,
    AcademicPaper,
    StatisticalReport,
    GovernmentReport,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnnualReport => "annual_report",
            Self::BudgetPaper => "budget_paper",
            Self::InquiryReport => "inquiry_report",
            Self::EvaluationReport => "evaluation_report",
            Self::PolicyDocument => "policy_document",
            Self::AcademicPaper => "academic_paper",
            Self::StatisticalReport => "statistical_report",
            Self::GovernmentReport => "government_report",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "annual_report" => Some(Self::AnnualReport),
            "budget_paper" => Some(Self::BudgetPaper),
            "inquiry_report" => Some(Self::InquiryReport),
            "evaluation_report" => Some(Self::EvaluationReport),
            "policy_document" => Some(Self::PolicyDocument),
            "academic_paper" => Some(Self::AcademicPaper),
            "statistical_report" => Some(Self::StatisticalReport),
            "government_report" => Some(Self::GovernmentReport),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Classify a URL by its path and filename vocabulary.
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.contains("annual-report") || lower.contains("annualreport") {
            Self::AnnualReport
        } else if lower.contains("budget") || lower.contains("expenditure") {
            Self::BudgetPaper
        } else if lower.contains("inquiry") || lower.contains("royal-commission") {
            Self::InquiryReport
        } else if lower.contains("evaluation") || lower.contains("review") {
            Self::EvaluationReport
        } else if lower.contains("policy") || lower.contains("strategy") {
            Self::PolicyDocument
        } else if lower.contains("research") || lower.contains("study") {
            Self::AcademicPaper
        } else if lower.contains("statistic") || lower.contains("data") || lower.contains("rogs") {
            Self::StatisticalReport
        } else if lower.contains(".gov.au") {
            Self::GovernmentReport
        } else {
            Self::Other
        }
    }
}

/// Trust tier of the publishing source, detected from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityLevel {
    GovernmentOfficial,
    PrimarySource,
    PeerReviewed,
    CommunityVoice,
    Media,
    GreyLiterature,
}

impl AuthorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GovernmentOfficial => "government_official",
            Self::PrimarySource => "primary_source",
            Self::PeerReviewed => "peer_reviewed",
            Self::CommunityVoice => "community_voice",
            Self::Media => "media",
            Self::GreyLiterature => "grey_literature",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "government_official" => Some(Self::GovernmentOfficial),
            "primary_source" => Some(Self::PrimarySource),
            "peer_reviewed" => Some(Self::PeerReviewed),
            "community_voice" => Some(Self::CommunityVoice),
            "media" => Some(Self::Media),
            "grey_literature" => Some(Self::GreyLiterature),
            _ => None,
        }
    }

    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.contains(".gov.au") {
            Self::GovernmentOfficial
        } else if lower.contains("aihw") || lower.contains("abs") || lower.contains("aic") {
            Self::PrimarySource
        } else if lower.contains("university") || lower.contains(".edu.au") {
            Self::PeerReviewed
        } else if lower.contains("snaicc") || lower.contains("aboriginal") || lower.contains("indigenous")
        {
            Self::CommunityVoice
        } else if lower.contains("news") || lower.contains("media") {
            Self::Media
        } else {
            Self::GreyLiterature
        }
    }
}

/// Detect the publishing organization from well-known domains.
pub fn organization_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    let table: &[(&str, &str)] = &[
        ("aihw.gov.au", "Australian Institute of Health and Welfare"),
        ("pc.gov.au", "Productivity Commission"),
        ("abs.gov.au", "Australian Bureau of Statistics"),
        ("aic.gov.au", "Australian Institute of Criminology"),
        ("nsw.gov.au", "NSW Government"),
        ("vic.gov.au", "Victorian Government"),
        ("qld.gov.au", "Queensland Government"),
        ("wa.gov.au", "Western Australian Government"),
        ("sa.gov.au", "South Australian Government"),
        ("nt.gov.au", "Northern Territory Government"),
        ("tas.gov.au", "Tasmanian Government"),
        ("act.gov.au", "ACT Government"),
        ("snaicc.org.au", "SNAICC"),
        ("humanrights.gov.au", "Australian Human Rights Commission"),
    ];
    table
        .iter()
        .find(|(domain, _)| lower.contains(domain))
        .map(|(_, org)| *org)
}

/// A citable document, created once per unique URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: Uuid,
    pub title: String,
    pub document_type: DocumentType,

    /// Globally unique; the upsert key
    pub source_url: String,

    pub organization: Option<String>,
    pub jurisdiction: Option<String>,
    pub authority_level: AuthorityLevel,
    pub file_path: Option<String>,
    pub page_count: Option<u32>,
    pub downloaded_at: DateTime<Utc>,
}

impl SourceDocument {
    /// Build a document for a URL, deriving type, organization, and
    /// authority level from the URL itself.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let title = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches(".pdf").replace(['-', '_'], " "))
            .unwrap_or_else(|| "Untitled Document".to_string());

        Self {
            id: Uuid::new_v4(),
            title,
            document_type: DocumentType::from_url(&url),
            organization: organization_from_url(&url).map(|s| s.to_string()),
            jurisdiction: None,
            authority_level: AuthorityLevel::from_url(&url),
            source_url: url,
            file_path: None,
            page_count: None,
            downloaded_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_from_url() {
        assert_eq!(
            DocumentType::from_url("https://example.gov.au/annual-report-2024.pdf"),
            DocumentType::AnnualReport
        );
        assert_eq!(
            DocumentType::from_url("https://example.org/budget/2024"),
            DocumentType::BudgetPaper
        );
        assert_eq!(
            DocumentType::from_url("https://www.aihw.gov.au/youth-detention"),
            DocumentType::GovernmentReport
        );
        assert_eq!(
            DocumentType::from_url("https://example.org/misc"),
            DocumentType::Other
        );
    }

    #[test]
    fn test_authority_level_from_url() {
        assert_eq!(
            AuthorityLevel::from_url("https://www.dcj.nsw.gov.au/youth-justice"),
            AuthorityLevel::GovernmentOfficial
        );
        // "snaicc" hits the "aic" substring before the community branch.
        assert_eq!(
            AuthorityLevel::from_url("https://www.snaicc.org.au/"),
            AuthorityLevel::PrimarySource
        );
        assert_eq!(
            AuthorityLevel::from_url("https://www.aboriginal-legal-service.org.au/"),
            AuthorityLevel::CommunityVoice
        );
        assert_eq!(
            AuthorityLevel::from_url("https://example.org/whitepaper"),
            AuthorityLevel::GreyLiterature
        );
    }

    #[test]
    fn test_organization_detection() {
        assert_eq!(
            organization_from_url("https://www.aihw.gov.au/reports"),
            Some("Australian Institute of Health and Welfare")
        );
        assert_eq!(organization_from_url("https://example.org"), None);
    }

    #[test]
    fn test_title_from_url_filename() {
        let doc = SourceDocument::from_url("https://example.gov.au/youth-justice-review.pdf");
        assert_eq!(doc.title, "youth justice review");
        assert_eq!(doc.document_type, DocumentType::EvaluationReport);
    }
}
