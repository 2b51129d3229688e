//! The fixed extraction schema returned by reasoning providers.
//!
//! The prompt contract requests exactly these typed arrays. Responses are
//! strict-parsed; missing arrays default to empty so a provider that omits
//! a section does not fail the whole decode.

use serde::{Deserialize, Serialize};

/// Structured candidate facts for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredFacts {
    #[serde(default)]
    pub interventions: Vec<CandidateIntervention>,

    #[serde(default)]
    pub findings: Vec<ResearchFinding>,

    #[serde(default)]
    pub recommendations: Vec<InquiryRecommendation>,

    #[serde(default)]
    pub cases: Vec<LegalCase>,

    #[serde(default)]
    pub statistics: Vec<StatisticFact>,

    #[serde(default, rename = "fundingMentions")]
    pub funding_mentions: Vec<FundingMention>,
}

impl StructuredFacts {
    /// True when no array holds any fact.
    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
            && self.findings.is_empty()
            && self.recommendations.is_empty()
            && self.cases.is_empty()
            && self.statistics.is_empty()
            && self.funding_mentions.is_empty()
    }
}

/// A candidate program or service, before resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateIntervention {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub description: String,

    #[serde(default)]
    pub target_cohort: Vec<String>,

    #[serde(default)]
    pub geography: Vec<String>,

    #[serde(default)]
    pub operating_org: Option<String>,
}

/// A research report or study finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchFinding {
    pub title: String,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub year: Option<String>,

    #[serde(default)]
    pub key_findings: Vec<String>,
}

/// A recommendation from an inquiry or royal commission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryRecommendation {
    pub name: String,

    #[serde(default)]
    pub year: Option<String>,

    #[serde(default)]
    pub recommendations: Vec<String>,

    #[serde(default)]
    pub status: Option<String>,
}

/// A court case or legal precedent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalCase {
    pub name: String,

    #[serde(default)]
    pub year: Option<String>,

    #[serde(default)]
    pub significance: Option<String>,

    #[serde(default)]
    pub outcome: Option<String>,
}

/// A single reported metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticFact {
    pub metric: String,
    pub value: String,

    #[serde(default)]
    pub year: Option<String>,

    #[serde(default)]
    pub jurisdiction: Option<String>,

    #[serde(default)]
    pub source: Option<String>,
}

/// A funding amount tied to a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingMention {
    pub amount: String,

    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub year: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_parses() {
        let facts: StructuredFacts = serde_json::from_str("{}").unwrap();
        assert!(facts.is_empty());
    }

    #[test]
    fn test_partial_response_parses() {
        let json = r#"{
            "interventions": [
                {
                    "name": "Youth Diversion Program",
                    "type": "Diversion",
                    "description": "Court diversion for first offenders",
                    "geography": ["QLD"]
                }
            ],
            "statistics": [
                {"metric": "recidivism rate", "value": "54%", "year": "2024"}
            ]
        }"#;

        let facts: StructuredFacts = serde_json::from_str(json).unwrap();
        assert_eq!(facts.interventions.len(), 1);
        assert_eq!(facts.interventions[0].kind, "Diversion");
        assert!(facts.interventions[0].target_cohort.is_empty());
        assert_eq!(facts.statistics.len(), 1);
        assert!(facts.findings.is_empty());
        assert!(!facts.is_empty());
    }

    #[test]
    fn test_malformed_response_fails_decode() {
        let err = serde_json::from_str::<StructuredFacts>("not json at all");
        assert!(err.is_err());
    }
}
