//! Keyword-based domain suggestion.
//!
//! Counts case-insensitive keyword hits in a disclosure's text for each
//! admin-curated keyword list and picks the best match.

use patentwise_core::DomainKeywords;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSuggestion {
    pub domain_id: String,
    pub domain: String,
    pub hits: usize,
    pub matched: Vec<String>,
}

/// Suggest the domain whose keywords appear most often in `text`.
///
/// Each keyword counts once. Ties go to the entry listed first. Returns
/// `None` when no keyword appears at all.
pub fn suggest_domain(text: &str, keyword_sets: &[DomainKeywords]) -> Option<DomainSuggestion> {
    let haystack = text.to_lowercase();
    let mut best: Option<DomainSuggestion> = None;

    for entry in keyword_sets {
        let matched: Vec<String> = entry
            .keywords
            .iter()
            .filter(|kw| !kw.trim().is_empty() && haystack.contains(&kw.to_lowercase()))
            .cloned()
            .collect();
        if matched.is_empty() {
            continue;
        }
        if best.as_ref().is_some_and(|b| b.hits >= matched.len()) {
            continue;
        }
        best = Some(DomainSuggestion {
            domain_id: entry.domain_id.clone(),
            domain: entry.domain.clone(),
            hits: matched.len(),
            matched,
        });
    }

    best
}
