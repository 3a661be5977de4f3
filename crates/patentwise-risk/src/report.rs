//! Display-ready risk report for one analysis result.
//!
//! Classifies every score on an [`AnalysisResult`] with the shared thresholds
//! so every results view shows the same tiers.

use patentwise_core::{AnalysisResult, SubmissionId};
use serde::Serialize;

use crate::distribution::{DistributionView, normalize_domain_distribution};
use crate::prior_art::{PriorArtAssessment, assess_prior_art};
use crate::tier::{RiskTier, classify, classify_novelty, is_valid_score};

/// A raw score next to the tier it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TieredScore {
    pub score: f64,
    pub tier: RiskTier,
}

impl TieredScore {
    fn risk(score: f64) -> Self {
        Self {
            score,
            tier: classify(score),
        }
    }

    fn novelty(score: f64) -> Self {
        Self {
            score,
            tier: classify_novelty(score),
        }
    }

    /// Score as a whole percentage, for display.
    pub fn percent(&self) -> f64 {
        (self.score * 100.0).round()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedMatch {
    pub patent_id: String,
    pub title: Option<String>,
    pub similarity: TieredScore,
    pub matched_claims: Vec<u32>,
    pub key_overlap: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedInfringement {
    pub patent_id: String,
    pub title: Option<String>,
    pub owner: String,
    pub risk: TieredScore,
    pub conflicting_elements: Vec<String>,
}

/// Tiers for every score on an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub submission_id: SubmissionId,
    pub overall: TieredScore,
    pub novelty: TieredScore,
    pub technical_overlap: TieredScore,
    pub prior_art: Vec<ClassifiedMatch>,
    pub infringement: Vec<ClassifiedInfringement>,
    pub prior_art_assessment: PriorArtAssessment,
    pub distribution: DistributionView,
    /// Fields whose score was outside `[0, 1]` or not a number.
    pub invalid_scores: Vec<String>,
}

impl RiskReport {
    /// Build a report using the given similarity alert threshold and
    /// distribution epsilon.
    pub fn from_analysis(result: &AnalysisResult, similarity_threshold: f64, epsilon: f64) -> Self {
        let metrics = &result.metrics;
        let mut invalid_scores = Vec::new();
        let mut check = |field: String, score: f64| {
            if !is_valid_score(score) {
                invalid_scores.push(field);
            }
        };

        check("overallRiskScore".into(), metrics.overall_risk_score);
        check("noveltyScore".into(), metrics.novelty_score);
        check("technicalOverlapScore".into(), metrics.technical_overlap_score);
        for m in &result.prior_art_matches {
            check(format!("priorArtMatches[{}].similarityScore", m.patent_id), m.similarity_score);
        }
        for r in &result.infringement_risks {
            check(format!("infringementRisks[{}].riskScore", r.patent_id), r.risk_score);
        }
        if !invalid_scores.is_empty() {
            tracing::warn!(
                submission = %result.submission_id,
                fields = ?invalid_scores,
                "analysis result carries out-of-range scores"
            );
        }

        let prior_art = result
            .prior_art_matches
            .iter()
            .map(|m| ClassifiedMatch {
                patent_id: m.patent_id.clone(),
                title: m.title.clone(),
                similarity: TieredScore::risk(m.similarity_score),
                matched_claims: m.matched_claims.iter().copied().collect(),
                key_overlap: m.key_overlap.clone(),
            })
            .collect();

        let infringement = result
            .infringement_risks
            .iter()
            .map(|r| ClassifiedInfringement {
                patent_id: r.patent_id.clone(),
                title: r.title.clone(),
                owner: r.owner.clone(),
                risk: TieredScore::risk(r.risk_score),
                conflicting_elements: r.conflicting_elements.clone(),
            })
            .collect();

        Self {
            submission_id: result.submission_id.clone(),
            overall: TieredScore::risk(metrics.overall_risk_score),
            novelty: TieredScore::novelty(metrics.novelty_score),
            technical_overlap: TieredScore::risk(metrics.technical_overlap_score),
            prior_art,
            infringement,
            prior_art_assessment: assess_prior_art(&result.prior_art_matches, similarity_threshold),
            distribution: normalize_domain_distribution(&metrics.domain_distribution, epsilon),
            invalid_scores,
        }
    }

    /// The tier shown as the submission's headline risk level.
    pub fn headline_tier(&self) -> RiskTier {
        self.overall.tier
    }

    /// The most severe tier anywhere in the report.
    pub fn worst_tier(&self) -> RiskTier {
        self.prior_art
            .iter()
            .map(|m| m.similarity.tier)
            .chain(self.infringement.iter().map(|r| r.risk.tier))
            .chain([
                self.overall.tier,
                self.novelty.tier,
                self.technical_overlap.tier,
            ])
            .max()
            .unwrap_or(RiskTier::Low)
    }
}
