//! Prior-art assessment and alert derivation.

use chrono::{DateTime, Utc};
use patentwise_core::{Alert, AlertId, AlertKind, AnalysisResult, PriorArtMatch, SubmissionId};
use serde::Serialize;

use crate::tier::{RiskTier, classify};

/// More highly-similar matches than this makes the prior-art picture High risk.
const HIGH_RISK_MATCH_COUNT: usize = 2;
/// Matches averaged for the headline similarity figure.
const TOP_MATCHES: usize = 3;

/// Summary of how crowded the prior-art landscape is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorArtAssessment {
    pub tier: RiskTier,
    /// Matches with similarity at or above the alert threshold.
    pub high_similarity_count: usize,
    /// Mean similarity of the top three matches (0 when there are none).
    pub average_similarity: f64,
    pub risk_factors: Vec<&'static str>,
}

/// Assess prior-art matches against the similarity alert threshold.
pub fn assess_prior_art(matches: &[PriorArtMatch], threshold: f64) -> PriorArtAssessment {
    let high_similarity_count = matches
        .iter()
        .filter(|m| m.similarity_score >= threshold)
        .count();

    let (tier, risk_factors) = if high_similarity_count > HIGH_RISK_MATCH_COUNT {
        (
            RiskTier::High,
            vec![
                "Multiple highly similar patents found",
                "High potential for infringement",
            ],
        )
    } else if high_similarity_count > 0 {
        (
            RiskTier::Moderate,
            vec![
                "One or more similar patents found",
                "Moderate potential for infringement",
            ],
        )
    } else {
        (RiskTier::Low, vec!["No highly similar patents found"])
    };

    let mut scores: Vec<f64> = matches.iter().map(|m| m.similarity_score).collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    let top = &scores[..scores.len().min(TOP_MATCHES)];
    let average_similarity = if top.is_empty() {
        0.0
    } else {
        top.iter().sum::<f64>() / top.len() as f64
    };

    PriorArtAssessment {
        tier,
        high_similarity_count,
        average_similarity,
        risk_factors,
    }
}

/// Derive the alerts an analysis result should raise for its submission.
///
/// - `new_match` for each prior-art match at or above `threshold`
/// - `infringement` for each infringement risk classified High
/// - one `critical_change` when the overall risk score is High
///
/// All alerts start unread and are stamped with `now`.
pub fn derive_alerts(
    title: &str,
    result: &AnalysisResult,
    threshold: f64,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let submission_id = &result.submission_id;
    let mut alerts = Vec::new();

    for m in result
        .prior_art_matches
        .iter()
        .filter(|m| m.similarity_score >= threshold)
    {
        alerts.push(new_alert(
            AlertKind::NewMatch,
            format!(
                "Prior art {} is {:.0}% similar to \"{title}\"",
                m.patent_id,
                m.similarity_score * 100.0
            ),
            submission_id,
            now,
        ));
    }

    for risk in result
        .infringement_risks
        .iter()
        .filter(|r| classify(r.risk_score) == RiskTier::High)
    {
        alerts.push(new_alert(
            AlertKind::Infringement,
            format!(
                "Potential infringement detected for \"{title}\" against {} ({})",
                risk.patent_id, risk.owner
            ),
            submission_id,
            now,
        ));
    }

    if classify(result.metrics.overall_risk_score) == RiskTier::High {
        alerts.push(new_alert(
            AlertKind::CriticalChange,
            format!("\"{title}\" has been assessed as high risk"),
            submission_id,
            now,
        ));
    }

    tracing::debug!(submission = %submission_id, count = alerts.len(), "derived alerts");
    alerts
}

fn new_alert(
    kind: AlertKind,
    message: String,
    submission_id: &SubmissionId,
    now: DateTime<Utc>,
) -> Alert {
    Alert {
        id: AlertId::generate(),
        kind,
        message,
        related_submission_id: submission_id.clone(),
        read: false,
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentwise_core::{AnalysisMetrics, InfringementRisk};

    fn prior(id: &str, score: f64) -> PriorArtMatch {
        PriorArtMatch {
            patent_id: id.into(),
            title: None,
            similarity_score: score,
            matched_claims: Default::default(),
            key_overlap: vec![],
        }
    }

    fn result(matches: Vec<PriorArtMatch>, risks: Vec<(&str, f64)>, overall: f64) -> AnalysisResult {
        AnalysisResult {
            submission_id: SubmissionId::from("sub-1"),
            key_phrases: vec![],
            entities: vec![],
            prior_art_matches: matches,
            infringement_risks: risks
                .into_iter()
                .map(|(id, score)| InfringementRisk {
                    patent_id: id.into(),
                    title: None,
                    owner: "Tech Innovations Inc.".into(),
                    risk_score: score,
                    conflicting_elements: vec![],
                })
                .collect(),
            ipc_codes: vec![],
            metrics: AnalysisMetrics {
                overall_risk_score: overall,
                novelty_score: 0.5,
                technical_overlap_score: 0.5,
                domain_distribution: Default::default(),
            },
        }
    }

    #[test]
    fn no_close_matches_is_low() {
        let a = assess_prior_art(&[prior("a", 0.5), prior("b", 0.79)], 0.8);
        assert_eq!(a.tier, RiskTier::Low);
        assert_eq!(a.high_similarity_count, 0);
        assert_eq!(a.risk_factors, vec!["No highly similar patents found"]);
    }

    #[test]
    fn one_or_two_close_matches_is_moderate() {
        let a = assess_prior_art(&[prior("a", 0.8), prior("b", 0.9), prior("c", 0.1)], 0.8);
        assert_eq!(a.tier, RiskTier::Moderate);
        assert_eq!(a.high_similarity_count, 2);
    }

    #[test]
    fn three_close_matches_is_high() {
        let a = assess_prior_art(
            &[prior("a", 0.8), prior("b", 0.9), prior("c", 0.85), prior("d", 0.2)],
            0.8,
        );
        assert_eq!(a.tier, RiskTier::High);
        assert_eq!(a.high_similarity_count, 3);
        assert!((a.average_similarity - 0.85).abs() < 1e-9);
    }

    #[test]
    fn empty_matches_average_zero() {
        let a = assess_prior_art(&[], 0.8);
        assert_eq!(a.average_similarity, 0.0);
        assert_eq!(a.tier, RiskTier::Low);
    }

    #[test]
    fn derives_one_alert_per_trigger() {
        let r = result(
            vec![prior("US1", 0.85), prior("US2", 0.72)],
            vec![("US1", 0.85), ("US2", 0.65)],
            0.78,
        );
        let now: DateTime<Utc> = "2026-04-16T00:00:00Z".parse().unwrap();
        let alerts = derive_alerts("Method for NLP", &r, 0.8, now);

        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AlertKind::NewMatch, AlertKind::Infringement, AlertKind::CriticalChange]
        );
        assert!(alerts.iter().all(|a| !a.read && a.created_at == now));
        assert!(alerts.iter().all(|a| a.related_submission_id.as_str() == "sub-1"));
        assert!(alerts[0].message.contains("85%"));
        assert!(alerts[1].message.contains("Tech Innovations Inc."));
    }

    #[test]
    fn quiet_result_raises_nothing() {
        let r = result(vec![prior("US1", 0.3)], vec![("US1", 0.5)], 0.4);
        assert!(derive_alerts("x", &r, 0.8, Utc::now()).is_empty());
    }
}
