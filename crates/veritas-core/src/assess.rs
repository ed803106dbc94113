//! Per-claim assessment
//!
//! Retrieves evidence for one claim, scores every item for entailment and
//! keeps the strongest. Support is the maximum entailment score: one strongly
//! supporting snippet is enough.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::claim::Claim;
use crate::entailment::EntailmentScorer;
use crate::error::AssessError;
use crate::evidence::{EvidenceRetriever, ScoredEvidence};

/// Outcome of assessing one claim, before thresholds are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub claim: Claim,
    /// Maximum entailment score over all evidence; 0.0 without evidence
    pub support: f64,
    /// First item (in retrieval order) reaching `support`
    pub best_evidence: Option<ScoredEvidence>,
    /// Every scored item, in retrieval order
    pub all_evidence: Vec<ScoredEvidence>,
}

/// Orchestrates retrieval and entailment scoring for a claim.
#[derive(Clone)]
pub struct ClaimAssessor {
    retriever: EvidenceRetriever,
    scorer: EntailmentScorer,
}

impl ClaimAssessor {
    pub fn new(retriever: EvidenceRetriever, scorer: EntailmentScorer) -> Self {
        Self { retriever, scorer }
    }

    pub fn assess(&self, claim: &Claim, top_k: usize) -> Result<Assessment, AssessError> {
        self.assess_until(claim, top_k, None)
    }

    /// Assess `claim`, giving up once `deadline` has passed.
    ///
    /// The deadline is checked before every collaborator call.
    pub fn assess_until(
        &self,
        claim: &Claim,
        top_k: usize,
        deadline: Option<Instant>,
    ) -> Result<Assessment, AssessError> {
        check_deadline(deadline)?;
        let items = self.retriever.retrieve(claim.as_str(), top_k)?;

        let mut all_evidence = Vec::with_capacity(items.len());
        for item in items {
            check_deadline(deadline)?;
            let score = self.scorer.score(claim.as_str(), &item.snippet)?;
            all_evidence.push(ScoredEvidence::new(item, score));
        }

        let best_evidence = best_of(&all_evidence).cloned();
        let support = best_evidence
            .as_ref()
            .map(|e| e.entailment_score)
            .unwrap_or(0.0);

        debug!(
            "Assessed claim at position {}: support={:.3} over {} items",
            claim.position,
            support,
            all_evidence.len()
        );

        Ok(Assessment {
            claim: claim.clone(),
            support,
            best_evidence,
            all_evidence,
        })
    }
}

/// Highest entailment score; the earliest item wins ties.
fn best_of(evidence: &[ScoredEvidence]) -> Option<&ScoredEvidence> {
    let mut best: Option<&ScoredEvidence> = None;
    for item in evidence {
        match best {
            Some(b) if item.entailment_score <= b.entailment_score => {}
            _ => best = Some(item),
        }
    }
    best
}

fn check_deadline(deadline: Option<Instant>) -> Result<(), AssessError> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(AssessError::DeadlineExceeded),
        _ => Ok(()),
    }
}
