//! Score-to-tier classification.
//!
//! Every risk-sense score (overall risk, technical overlap, prior-art
//! similarity, infringement risk) shares one set of thresholds. Novelty runs
//! the other way: a low novelty score means high risk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores strictly above this are High risk.
pub const HIGH_RISK_ABOVE: f64 = 0.7;
/// Scores strictly above this (and not High) are Moderate risk.
pub const MODERATE_RISK_ABOVE: f64 = 0.4;
/// Novelty strictly below this is High risk.
pub const HIGH_RISK_NOVELTY_BELOW: f64 = 0.3;
/// Novelty strictly below this (and not High) is Moderate risk.
pub const MODERATE_RISK_NOVELTY_BELOW: f64 = 0.6;

/// Categorical risk tier. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify a risk-sense score in `[0, 1]`.
///
/// `> 0.7` is High, `(0.4, 0.7]` is Moderate, `<= 0.4` is Low.
/// NaN compares false against both thresholds and lands in Low; callers that
/// may see malformed input should check [`is_valid_score`] first.
pub fn classify(score: f64) -> RiskTier {
    if score > HIGH_RISK_ABOVE {
        RiskTier::High
    } else if score > MODERATE_RISK_ABOVE {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    }
}

/// Classify a novelty score in `[0, 1]` into the risk it implies.
///
/// `< 0.3` is High, `[0.3, 0.6)` is Moderate, `>= 0.6` is Low.
pub fn classify_novelty(score: f64) -> RiskTier {
    if score < HIGH_RISK_NOVELTY_BELOW {
        RiskTier::High
    } else if score < MODERATE_RISK_NOVELTY_BELOW {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    }
}

/// Whether `score` is a finite value in `[0, 1]`.
pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (0.0..=1.0).contains(&score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(classify(0.71), RiskTier::High);
        assert_eq!(classify(0.70), RiskTier::Moderate);
        assert_eq!(classify(0.41), RiskTier::Moderate);
        assert_eq!(classify(0.40), RiskTier::Low);
        assert_eq!(classify(0.0), RiskTier::Low);
        assert_eq!(classify(1.0), RiskTier::High);
    }

    #[test]
    fn similarity_examples() {
        assert_eq!(classify(0.85), RiskTier::High);
        assert_eq!(classify(0.5), RiskTier::Moderate);
        assert_eq!(classify(0.2), RiskTier::Low);
    }

    #[test]
    fn novelty_boundaries_are_exact() {
        assert_eq!(classify_novelty(0.29), RiskTier::High);
        assert_eq!(classify_novelty(0.3), RiskTier::Moderate);
        assert_eq!(classify_novelty(0.59), RiskTier::Moderate);
        assert_eq!(classify_novelty(0.6), RiskTier::Low);
        assert_eq!(classify_novelty(1.0), RiskTier::Low);
        assert_eq!(classify_novelty(0.0), RiskTier::High);
    }

    #[test]
    fn tiers_order_by_severity() {
        assert!(RiskTier::Low < RiskTier::Moderate);
        assert!(RiskTier::Moderate < RiskTier::High);
    }

    #[test]
    fn score_validity() {
        assert!(is_valid_score(0.0));
        assert!(is_valid_score(1.0));
        assert!(!is_valid_score(1.01));
        assert!(!is_valid_score(-0.1));
        assert!(!is_valid_score(f64::NAN));
    }

    proptest! {
        #[test]
        fn classify_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(lo) <= classify(hi));
        }

        #[test]
        fn novelty_is_antitonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_novelty(lo) >= classify_novelty(hi));
        }
    }
}
