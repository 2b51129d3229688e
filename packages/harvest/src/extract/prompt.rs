//! Extraction prompt construction and response cleanup.

/// Build the extraction prompt for one document.
///
/// The schema embedded here matches [`StructuredFacts`](crate::types::StructuredFacts)
/// exactly; the jurisdiction is threaded into the geography and
/// statistics sections so providers attribute facts correctly. `text`
/// is truncated to `budget` characters.
pub fn build_extraction_prompt(text: &str, jurisdiction: &str, budget: usize) -> String {
    let truncated = truncate_to_budget(text, budget);

    format!(
        r#"Extract ALL youth justice information from this Australian {jurisdiction} content. Be THOROUGH.

IMPORTANT: Look for:
1. Programs and services (diversion, rehabilitation, support)
2. Research findings and statistics
3. Royal Commission/Inquiry recommendations
4. Government reports (ROGS, AIHW, ABS data)
5. Court cases or legal precedents
6. Detention facilities
7. Policy changes or reforms

Return ONLY valid JSON (no markdown, no code blocks):
{{
  "interventions": [
    {{
      "name": "Program/service name",
      "type": "Prevention|Diversion|Cultural Connection|Education/Employment|Family Strengthening|Therapeutic|Community-Led|Justice Reinvestment|Wraparound Support|Early Intervention",
      "description": "Detailed description (2-3 sentences)",
      "target_cohort": ["Target groups"],
      "geography": ["{jurisdiction}", "specific locations"],
      "operating_org": "Organization running it"
    }}
  ],
  "findings": [
    {{
      "title": "Report/study title",
      "source": "Organization (e.g., AIHW, Productivity Commission, University)",
      "year": "Publication year",
      "key_findings": ["Finding 1", "Finding 2"]
    }}
  ],
  "recommendations": [
    {{
      "name": "Inquiry/Royal Commission name",
      "year": "Year",
      "recommendations": ["Key recommendation 1", "Key recommendation 2"],
      "status": "implemented|pending|rejected"
    }}
  ],
  "cases": [
    {{
      "name": "Case name or citation",
      "year": "Year",
      "significance": "Why this case matters for youth justice",
      "outcome": "What was decided"
    }}
  ],
  "statistics": [
    {{
      "metric": "What is measured (e.g., youth detention rate)",
      "value": "The number/percentage",
      "year": "Year of data",
      "jurisdiction": "{jurisdiction}",
      "source": "Data source"
    }}
  ],
  "fundingMentions": [
    {{
      "amount": "Dollar amount",
      "program": "What it funds",
      "year": "Budget year"
    }}
  ]
}}

Extract EVERYTHING relevant to youth justice - programs, data, recommendations, cases.

Content:
{truncated}"#
    )
}

/// Truncate at a char boundary at or below `budget` bytes.
fn truncate_to_budget(text: &str, budget: usize) -> &str {
    if text.len() <= budget {
        return text;
    }
    let mut end = budget;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Strip a wrapping markdown code fence from a model response.
///
/// Providers routinely wrap JSON in ```json fences despite being asked
/// not to.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
