//! Risk classification engine: pure functions from analysis scores to tiers
//! and dashboard metrics.

pub mod distribution;
pub mod keywords;
pub mod metrics;
pub mod prior_art;
pub mod report;
pub mod tier;

pub use distribution::{DistributionView, DomainShare, normalize_domain_distribution};
pub use keywords::{DomainSuggestion, suggest_domain};
pub use metrics::{DashboardMetrics, aggregate_dashboard_metrics, mark_alert_read};
pub use prior_art::{PriorArtAssessment, assess_prior_art, derive_alerts};
pub use report::{ClassifiedInfringement, ClassifiedMatch, RiskReport, TieredScore};
pub use tier::{RiskTier, classify, classify_novelty, is_valid_score};
