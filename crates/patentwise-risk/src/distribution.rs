//! Domain distribution checks.
//!
//! The pipeline promises percentages that sum to 100. The engine never
//! rescales them; a distribution that breaks the promise renders as unknown.

use std::collections::BTreeMap;

use serde::Serialize;

const EXPECTED_TOTAL: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainShare {
    pub domain: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DistributionView {
    /// Shares in descending order of percentage, ties by domain name.
    Known { shares: Vec<DomainShare> },
    /// The distribution broke the sum-to-100 contract.
    Unknown { reason: String },
}

impl DistributionView {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }
}

/// Validate a domain distribution against the sum-to-100 contract.
///
/// Returns [`DistributionView::Unknown`] for an empty mapping, any negative or
/// non-finite value, or a total further than `epsilon` from 100.
pub fn normalize_domain_distribution(
    distribution: &BTreeMap<String, f64>,
    epsilon: f64,
) -> DistributionView {
    if distribution.is_empty() {
        return DistributionView::Unknown {
            reason: "no domains reported".into(),
        };
    }

    if let Some((domain, value)) = distribution
        .iter()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return DistributionView::Unknown {
            reason: format!("invalid share {value} for {domain}"),
        };
    }

    let total: f64 = distribution.values().sum();
    if (total - EXPECTED_TOTAL).abs() > epsilon {
        tracing::warn!(total, epsilon, "domain distribution does not sum to 100");
        return DistributionView::Unknown {
            reason: format!("shares sum to {total}, expected 100"),
        };
    }

    let mut shares: Vec<DomainShare> = distribution
        .iter()
        .map(|(domain, pct)| DomainShare {
            domain: domain.clone(),
            percentage: *pct,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.domain.cmp(&b.domain))
    });

    DistributionView::Known { shares }
}
