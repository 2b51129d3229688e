//! Record validation and grading against source-trust rules.

use chrono::{DateTime, Utc};
use serde_json::Value;
use url::Url;

use crate::types::{AuditRecord, Grade, Validation};

// Source trust penalties
const PENALTY_UNAPPROVED_DOMAIN: u8 = 30;
const PENALTY_MISSING_SOURCE_URL: u8 = 25;
const PENALTY_UNREACHABLE: u8 = 15;
const PENALTY_UNENCRYPTED: u8 = 10;

// Completeness/freshness penalties
const PENALTY_MISSING_TEMPORAL: u8 = 8;
const PENALTY_MISSING_DOCUMENT: u8 = 8;
const PENALTY_STALE: u8 = 8;

// Integrity penalties
const PENALTY_PLACEHOLDER: u8 = 40;
const PENALTY_IMPLAUSIBLE_NUMBER: u8 = 15;

const MAX_AGE_DAYS: i64 = 365;
const VALID_THRESHOLD: u8 = 40;

/// Domain suffixes accepted as trusted authorities.
const APPROVED_DOMAINS: &[&str] = &[
    "gov.au",
    "edu.au",
    "org.au",
    "csyw.qld.gov.au",
    "aihw.gov.au",
    "abs.gov.au",
    "aic.gov.au",
    "pc.gov.au",
    "snaicc.org.au",
    "humanrights.gov.au",
];

/// Serialized-record fragments that indicate placeholder or test data.
const PLACEHOLDER_INDICATORS: &[&str] = &[
    "lorem ipsum",
    "placeholder",
    "test data",
    "example.com",
    "to be confirmed",
    "tbd",
    "xxx",
];

/// Caller-supplied context about where a record came from.
///
/// Reachability is an input, not probed here: the pipeline just fetched
/// the URL and already knows.
#[derive(Debug, Clone, Default)]
pub struct RecordContext {
    pub source_url: Option<String>,

    /// Whether the source URL responded when it was fetched
    pub reachable: bool,

    /// Temporal metadata attached to the record, when any exists
    pub source_date: Option<DateTime<Utc>>,

    /// Whether a source document backs the record
    pub has_source_document: bool,
}

impl RecordContext {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: Some(source_url.into()),
            reachable: true,
            source_date: None,
            has_source_document: false,
        }
    }

    pub fn with_source_date(mut self, date: DateTime<Utc>) -> Self {
        self.source_date = Some(date);
        self
    }

    pub fn with_source_document(mut self) -> Self {
        self.has_source_document = true;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }
}

/// Scores records against source-trust, completeness, and integrity
/// rules.
///
/// Scoring starts at 100 and subtracts a fixed penalty per failed rule.
/// Placeholder indicators force-fail validity outright regardless of the
/// remaining score.
pub struct Validator {
    approved_domains: Vec<String>,
    scraper_name: String,
}

impl Validator {
    pub fn new(scraper_name: impl Into<String>) -> Self {
        Self {
            approved_domains: APPROVED_DOMAINS.iter().map(|s| s.to_string()).collect(),
            scraper_name: scraper_name.into(),
        }
    }

    /// Replace the approved-domain list.
    pub fn with_approved_domains(mut self, domains: Vec<String>) -> Self {
        self.approved_domains = domains;
        self
    }

    /// Score one record.
    pub fn validate(&self, record: &Value, ctx: &RecordContext) -> Validation {
        let mut score: i32 = 100;
        let mut issues = Vec::new();
        let mut force_fail = false;

        // Source trust
        match ctx.source_url.as_deref() {
            None => {
                score -= PENALTY_MISSING_SOURCE_URL as i32;
                issues.push("no source URL".to_string());
            }
            Some(url) => {
                if !self.is_approved_domain(url) {
                    score -= PENALTY_UNAPPROVED_DOMAIN as i32;
                    issues.push(format!("domain not in approved authority list: {url}"));
                }
                if !url.starts_with("https://") {
                    score -= PENALTY_UNENCRYPTED as i32;
                    issues.push("source not served over HTTPS".to_string());
                }
                if !ctx.reachable {
                    score -= PENALTY_UNREACHABLE as i32;
                    issues.push("source URL was unreachable".to_string());
                }
            }
        }

        // Completeness and freshness
        match ctx.source_date {
            None => {
                score -= PENALTY_MISSING_TEMPORAL as i32;
                issues.push("no temporal metadata".to_string());
            }
            Some(date) => {
                if (Utc::now() - date).num_days() > MAX_AGE_DAYS {
                    score -= PENALTY_STALE as i32;
                    issues.push(format!("data older than {MAX_AGE_DAYS} days"));
                }
            }
        }
        if !ctx.has_source_document {
            score -= PENALTY_MISSING_DOCUMENT as i32;
            issues.push("no source document metadata".to_string());
        }

        // Integrity
        if let Some(indicator) = find_placeholder(record) {
            score -= PENALTY_PLACEHOLDER as i32;
            issues.push(format!("placeholder/test-data indicator: {indicator:?}"));
            force_fail = true;
        }
        if let Some(problem) = find_implausible_number(record) {
            score -= PENALTY_IMPLAUSIBLE_NUMBER as i32;
            issues.push(problem);
        }

        let score = score.clamp(0, 100) as u8;
        Validation {
            valid: !force_fail && score >= VALID_THRESHOLD,
            score,
            issues,
            grade: Grade::from_score(score),
        }
    }

    /// Build the immutable audit row for a validation outcome.
    pub fn audit(
        &self,
        record: &Value,
        validation: &Validation,
        ctx: &RecordContext,
        data_type: &str,
    ) -> AuditRecord {
        AuditRecord::new(
            record,
            validation,
            ctx.source_url.clone(),
            self.scraper_name.clone(),
            data_type,
        )
    }

    fn is_approved_domain(&self, url: &str) -> bool {
        let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from))
        else {
            return false;
        };
        self.approved_domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }
}

/// Scan the serialized record for placeholder indicators.
fn find_placeholder(record: &Value) -> Option<&'static str> {
    let serialized = record.to_string().to_lowercase();
    PLACEHOLDER_INDICATORS
        .iter()
        .find(|indicator| serialized.contains(*indicator))
        .copied()
}

/// Check known numeric fields for implausible values.
///
/// Years outside 1900-2100 and percentage values above 100 are the two
/// failure shapes the harvested record kinds actually produce.
fn find_implausible_number(record: &Value) -> Option<String> {
    match record {
        Value::Object(map) => {
            for (key, value) in map {
                if key == "year" {
                    if let Some(year) = value.as_str().and_then(|s| s.parse::<i64>().ok()) {
                        if !(1900..=2100).contains(&year) {
                            return Some(format!("implausible year: {year}"));
                        }
                    }
                }
                if key == "value" {
                    if let Some(percent) = value
                        .as_str()
                        .and_then(|s| s.strip_suffix('%'))
                        .and_then(|s| s.trim().parse::<f64>().ok())
                    {
                        if !(0.0..=100.0).contains(&percent) {
                            return Some(format!("implausible percentage: {percent}"));
                        }
                    }
                }
                if let Some(problem) = find_implausible_number(value) {
                    return Some(problem);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(find_implausible_number),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn validator() -> Validator {
        Validator::new("link-follower")
    }

    fn good_context() -> RecordContext {
        RecordContext::new("https://www.aihw.gov.au/reports/youth-justice")
            .with_source_date(Utc::now())
            .with_source_document()
    }

    #[test]
    fn clean_record_from_trusted_source_grades_a() {
        let record = json!({"name": "Youth Koori Court", "description": "Culturally adapted court process."});
        let validation = validator().validate(&record, &good_context());

        assert!(validation.valid);
        assert_eq!(validation.score, 100);
        assert_eq!(validation.grade, Grade::A);
        assert!(validation.issues.is_empty());
    }

    #[test]
    fn missing_source_url_penalized() {
        let record = json!({"name": "Program"});
        let ctx = RecordContext {
            source_url: None,
            reachable: false,
            source_date: Some(Utc::now()),
            has_source_document: true,
        };
        let validation = validator().validate(&record, &ctx);

        assert_eq!(validation.score, 75);
        assert_eq!(validation.grade, Grade::B);
    }

    #[test]
    fn unapproved_http_domain_stacks_penalties() {
        let record = json!({"name": "Program"});
        let ctx = RecordContext::new("http://random-blog.example.net/post")
            .with_source_date(Utc::now())
            .with_source_document();
        let validation = validator().validate(&record, &ctx);

        // unapproved (-30) + unencrypted (-10)
        assert_eq!(validation.score, 60);
        assert_eq!(validation.grade, Grade::C);
        assert!(validation.valid);
    }

    #[test]
    fn placeholder_force_fails_even_with_high_score() {
        let record = json!({"name": "Program", "description": "lorem ipsum dolor sit amet"});
        let validation = validator().validate(&record, &good_context());

        assert!(!validation.valid);
        assert_eq!(validation.score, 60);
    }

    #[test]
    fn penalties_stack_across_tiers() {
        let ctx = RecordContext {
            source_url: None,
            reachable: false,
            source_date: None,
            has_source_document: false,
        };
        let record = json!({"name": "Program", "year": "1566"});
        let validation = validator().validate(&record, &ctx);

        // -25 source, -8 temporal, -8 document, -15 implausible year
        assert_eq!(validation.score, 44);
        assert_eq!(validation.grade, Grade::D);
        assert!(validation.valid);
    }

    #[test]
    fn stale_data_penalized() {
        let record = json!({"name": "Program"});
        let ctx = RecordContext::new("https://www.aihw.gov.au/report")
            .with_source_date(Utc::now() - Duration::days(400))
            .with_source_document();
        let validation = validator().validate(&record, &ctx);

        assert_eq!(validation.score, 92);
        assert!(validation
            .issues
            .iter()
            .any(|issue| issue.contains("older than")));
    }

    #[test]
    fn implausible_percentage_detected_in_nested_array() {
        let record = json!({
            "statistics": [
                {"metric": "detention rate", "value": "154%", "year": "2024"}
            ]
        });
        let validation = validator().validate(&record, &good_context());

        assert_eq!(validation.score, 85);
        assert!(validation.issues[0].contains("implausible percentage"));
    }

    #[test]
    fn score_never_goes_negative() {
        let record = json!({"name": "placeholder", "year": "9999"});
        let ctx = RecordContext {
            source_url: None,
            reachable: false,
            source_date: None,
            has_source_document: false,
        };
        let validation = validator().validate(&record, &ctx);
        assert!(validation.score <= 100);
        assert_eq!(validation.grade, Grade::F);
        assert!(!validation.valid);
    }

    #[test]
    fn audit_produced_for_failed_records() {
        let v = validator();
        let record = json!({"name": "test data entry"});
        let ctx = good_context();
        let validation = v.validate(&record, &ctx);
        assert!(!validation.valid);

        let audit = v.audit(&record, &validation, &ctx, "intervention");
        assert_eq!(audit.score, validation.score);
        assert_eq!(audit.scraper_name, "link-follower");
        assert_eq!(audit.data_type, "intervention");
        assert!(audit.source_url.is_some());
    }

    #[test]
    fn grading_is_monotonic_in_penalty_count() {
        let v = validator();
        let record = json!({"name": "Program"});

        let full = v.validate(&record, &good_context());
        let minus_doc = v.validate(
            &record,
            &RecordContext::new("https://www.aihw.gov.au/r").with_source_date(Utc::now()),
        );
        let minus_doc_and_date =
            v.validate(&record, &RecordContext::new("https://www.aihw.gov.au/r"));

        assert!(full.score > minus_doc.score);
        assert!(minus_doc.score > minus_doc_and_date.score);
    }
}
