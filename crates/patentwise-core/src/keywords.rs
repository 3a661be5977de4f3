//! Admin-curated keyword lists used to classify disclosures by domain.

use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// Keyword list for one classification domain.
///
/// `domain` is a free-form display name; admins may add domains beyond the
/// fixed [`Domain`] set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainKeywords {
    pub domain_id: String,
    pub domain: String,
    pub keywords: Vec<String>,
}

impl DomainKeywords {
    /// Build an entry, normalising the keyword list.
    pub fn new(
        domain_id: impl Into<String>,
        domain: impl Into<String>,
        keywords: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            domain_id: domain_id.into(),
            domain: domain.into().trim().to_string(),
            keywords: normalize_keywords(keywords),
        }
    }

    /// The fixed domain this entry refers to, if its name or id matches one.
    pub fn known_domain(&self) -> Option<Domain> {
        self.domain_id
            .parse()
            .ok()
            .or_else(|| self.domain.parse().ok())
    }

    /// Keywords are trimmed, blanks dropped, duplicates removed case-insensitively.
    pub fn normalized(mut self) -> Self {
        self.domain = self.domain.trim().to_string();
        self.keywords = normalize_keywords(&self.keywords);
        self
    }
}

/// Trim, drop blanks, and deduplicate keywords (case-insensitive, first spelling wins).
pub fn normalize_keywords(keywords: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for kw in keywords {
        let kw = kw.as_ref().trim();
        if kw.is_empty() {
            continue;
        }
        if out.iter().any(|existing| existing.eq_ignore_ascii_case(kw)) {
            continue;
        }
        out.push(kw.to_string());
    }
    out
}

/// Seed keyword lists used when the directory is empty.
pub fn default_domain_keywords() -> Vec<DomainKeywords> {
    vec![
        DomainKeywords::new(
            "ai",
            "AI",
            [
                "machine learning",
                "neural network",
                "deep learning",
                "natural language processing",
                "computer vision",
            ],
        ),
        DomainKeywords::new(
            "biotech",
            "Biotech",
            [
                "genome",
                "protein",
                "enzyme",
                "cell culture",
                "antibody",
                "therapeutic",
            ],
        ),
        DomainKeywords::new(
            "electronics",
            "Electronics",
            [
                "circuit",
                "semiconductor",
                "transistor",
                "microprocessor",
                "sensor",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_normalised() {
        let entry = DomainKeywords::new("ai", " AI ", ["  deep learning ", "", "Deep Learning", "vision"]);
        assert_eq!(entry.domain, "AI");
        assert_eq!(entry.keywords, vec!["deep learning", "vision"]);
    }

    #[test]
    fn known_domain_resolves_from_id_or_name() {
        assert_eq!(
            DomainKeywords::new("ai", "AI", Vec::<String>::new()).known_domain(),
            Some(Domain::Ai)
        );
        assert_eq!(
            DomainKeywords::new("new-1", "Biotechnology", Vec::<String>::new()).known_domain(),
            Some(Domain::Biotech)
        );
        assert_eq!(
            DomainKeywords::new("new-2", "LegalTech", Vec::<String>::new()).known_domain(),
            None
        );
    }

    #[test]
    fn defaults_cover_three_domains() {
        let defaults = default_domain_keywords();
        assert_eq!(defaults.len(), 3);
        assert!(defaults.iter().all(|d| d.known_domain().is_some()));
        assert!(defaults[1].keywords.contains(&"antibody".to_string()));
    }
}
