//! Verdict types

use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::evidence::ScoredEvidence;

/// The three possible outcomes for a claim or a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Truth,
    Falsehood,
    Neutral,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truth => write!(f, "truth"),
            Self::Falsehood => write!(f, "falsehood"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Verdict for a single claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimVerdict {
    pub claim: Claim,
    pub classification: Classification,
    /// Confidence in the classification (0.0 - 1.0)
    pub confidence: f64,
    /// Present iff retrieval returned at least one item
    pub best_evidence: Option<ScoredEvidence>,
}

/// Verdict for a whole passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallVerdict {
    pub classification: Classification,
    /// Confidence in the classification (0.0 - 1.0)
    pub confidence: f64,
    /// Per-claim verdicts in extraction order
    pub claims: Vec<ClaimVerdict>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Classification::Falsehood).unwrap(),
            r#""falsehood""#
        );
        let parsed: Classification = serde_json::from_str(r#""truth""#).unwrap();
        assert_eq!(parsed, Classification::Truth);
        assert_eq!(Classification::Neutral.to_string(), "neutral");
    }
}
