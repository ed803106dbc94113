//! Evidence types

use serde::{Deserialize, Serialize};

/// One knowledge-base record. Its array position is its index row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub snippet: String,
    /// Identifier or URL of the document the snippet came from
    pub source: String,
}

/// A snippet retrieved for a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub snippet: String,
    pub source: String,
    /// Similarity between claim and snippet, clamped to [0, 1]
    pub retrieval_score: f64,
}

impl EvidenceItem {
    pub fn new(record: &SnippetRecord, retrieval_score: f64) -> Self {
        Self {
            snippet: record.snippet.clone(),
            source: record.source.clone(),
            retrieval_score: clamp_unit(retrieval_score),
        }
    }
}

/// An evidence item with the entailment score of its claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvidence {
    #[serde(flatten)]
    pub evidence: EvidenceItem,
    pub entailment_score: f64,
}

impl ScoredEvidence {
    pub fn new(evidence: EvidenceItem, entailment_score: f64) -> Self {
        Self {
            evidence,
            entailment_score: clamp_unit(entailment_score),
        }
    }
}

/// Clamp a score or confidence to [0, 1]. NaN becomes 0.0.
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_bounds() {
        assert_eq!(clamp_unit(-0.3), 0.0);
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(0.42), 0.42);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn scored_evidence_serializes_flat() {
        let record = SnippetRecord {
            snippet: "Einstein was born in Ulm.".to_string(),
            source: "https://en.wikipedia.org/wiki/Albert_Einstein".to_string(),
        };
        let scored = ScoredEvidence::new(EvidenceItem::new(&record, 0.8), 0.95);
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["snippet"], "Einstein was born in Ulm.");
        assert_eq!(json["entailment_score"], 0.95);
        assert!(json.get("evidence").is_none());
    }
}
