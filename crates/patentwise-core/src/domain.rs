//! Technology domains a disclosure can be filed under.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of technology domains offered by the submission wizard.
///
/// Declaration order is the order the wizard lists them in, and the order
/// used to break ties when suggesting a domain from keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Ai,
    Biotech,
    Electronics,
    Mechanical,
    Software,
    Pharmaceutical,
    Telecommunications,
    Other,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown technology domain: {0:?}")]
pub struct UnknownDomain(pub String);

impl Domain {
    pub const ALL: [Domain; 8] = [
        Domain::Ai,
        Domain::Biotech,
        Domain::Electronics,
        Domain::Mechanical,
        Domain::Software,
        Domain::Pharmaceutical,
        Domain::Telecommunications,
        Domain::Other,
    ];

    /// Wire value, as sent to the ingestion API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Biotech => "biotech",
            Self::Electronics => "electronics",
            Self::Mechanical => "mechanical",
            Self::Software => "software",
            Self::Pharmaceutical => "pharmaceutical",
            Self::Telecommunications => "telecommunications",
            Self::Other => "other",
        }
    }

    /// Human-readable label shown in the domain selector and review recap.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ai => "Artificial Intelligence",
            Self::Biotech => "Biotechnology",
            Self::Electronics => "Electronics",
            Self::Mechanical => "Mechanical Engineering",
            Self::Software => "Software",
            Self::Pharmaceutical => "Pharmaceutical",
            Self::Telecommunications => "Telecommunications",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    /// Accepts the wire value or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(needle) || d.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}
