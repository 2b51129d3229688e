//! URL relevance scoring for frontier admission.

/// Keywords that mark a URL as directly on-topic.
const HIGH_RELEVANCE_KEYWORDS: &[&str] = &[
    "youth-justice",
    "youth-detention",
    "youth-diversion",
    "young-offender",
    "juvenile",
    "youth-program",
    "conferencing",
    "restorative",
    "koori",
    "aboriginal",
    "indigenous",
    "intervention",
    "prevention",
    "recidivism",
    "rehabilitation",
];

/// Keywords for adjacent topics worth a look.
const MEDIUM_RELEVANCE_KEYWORDS: &[&str] = &[
    "youth",
    "children",
    "family",
    "community-service",
    "child-protection",
    "welfare",
    "support-service",
];

/// Minimum score a link needs to be admitted to the frontier.
pub const MIN_RELEVANCE: i32 = 5;

/// Score a URL for youth-justice relevance.
///
/// High keywords score 10, medium keywords 5, PDFs 7, report/data
/// pages 6, everything else 1. First match in that order wins.
pub fn relevance_score(url: &str) -> i32 {
    let lower = url.to_lowercase();

    if HIGH_RELEVANCE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return 10;
    }
    if MEDIUM_RELEVANCE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return 5;
    }
    if lower.ends_with(".pdf") {
        return 7;
    }
    if lower.contains("report") || lower.contains("data") {
        return 6;
    }

    1
}

/// Best-effort jurisdiction detection from URL patterns.
pub fn detect_jurisdiction(url: &str) -> &'static str {
    let lower = url.to_lowercase();

    if lower.contains(".vic.gov.au") || lower.contains("victoria") {
        "VIC"
    } else if lower.contains(".qld.gov.au") || lower.contains("queensland") {
        "QLD"
    } else if lower.contains(".nsw.gov.au") || lower.contains("new-south-wales") {
        "NSW"
    } else if lower.contains(".nt.gov.au") || lower.contains("northern-territory") {
        "NT"
    } else if lower.contains(".sa.gov.au") || lower.contains("south-australia") {
        "SA"
    } else if lower.contains(".wa.gov.au") || lower.contains("western-australia") {
        "WA"
    } else if lower.contains(".tas.gov.au") || lower.contains("tasmania") {
        "TAS"
    } else if lower.contains(".act.gov.au") || lower.contains("canberra") {
        "ACT"
    } else if lower.contains("aihw.gov.au") || lower.contains("pc.gov.au") {
        "National"
    } else {
        "Unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_keyword_scores_ten() {
        assert_eq!(relevance_score("https://example.gov.au/youth-justice/programs"), 10);
        assert_eq!(relevance_score("https://example.org/RESTORATIVE-practice"), 10);
    }

    #[test]
    fn medium_keyword_scores_five() {
        assert_eq!(relevance_score("https://example.gov.au/children/services"), 5);
    }

    #[test]
    fn high_keyword_beats_pdf_suffix() {
        assert_eq!(relevance_score("https://example.gov.au/juvenile-stats.pdf"), 10);
    }

    #[test]
    fn pdf_suffix_scores_seven() {
        assert_eq!(relevance_score("https://example.gov.au/annual.pdf"), 7);
    }

    #[test]
    fn report_scores_six() {
        assert_eq!(relevance_score("https://example.gov.au/annual-report-2024"), 6);
    }

    #[test]
    fn unrelated_scores_one() {
        assert_eq!(relevance_score("https://example.gov.au/contact"), 1);
    }

    #[test]
    fn jurisdiction_from_domain() {
        assert_eq!(detect_jurisdiction("https://www.justice.vic.gov.au/page"), "VIC");
        assert_eq!(detect_jurisdiction("https://aihw.gov.au/reports"), "National");
        assert_eq!(detect_jurisdiction("https://example.com/page"), "Unknown");
    }
}
