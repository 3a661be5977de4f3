//! Analysis results produced by the external scoring pipeline.
//!
//! These types mirror the pipeline's camelCase JSON. Nothing in Patentwise
//! computes them; they are read-only input to the risk engine.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::submission::SubmissionId;

/// A named entity the pipeline extracted from the disclosure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub confidence_score: f64,
}

/// An existing patent whose content overlaps the disclosure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorArtMatch {
    pub patent_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub similarity_score: f64,
    #[serde(default)]
    pub matched_claims: BTreeSet<u32>,
    #[serde(default)]
    pub key_overlap: Vec<String>,
}

/// A competitor patent the disclosure may conflict with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfringementRisk {
    pub patent_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub owner: String,
    pub risk_score: f64,
    #[serde(default)]
    pub conflicting_elements: Vec<String>,
}

/// Aggregate scores for one analysed submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetrics {
    pub overall_risk_score: f64,
    pub novelty_score: f64,
    pub technical_overlap_score: f64,
    /// Percentage of technical content per classification domain.
    /// The pipeline guarantees the values sum to 100 (± rounding).
    #[serde(default)]
    pub domain_distribution: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub submission_id: SubmissionId,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub prior_art_matches: Vec<PriorArtMatch>,
    #[serde(default)]
    pub infringement_risks: Vec<InfringementRisk>,
    /// International Patent Classification codes assigned by the pipeline.
    #[serde(default)]
    pub ipc_codes: Vec<String>,
    pub metrics: AnalysisMetrics,
}
