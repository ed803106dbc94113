//! Entailment scoring
//!
//! The evidence snippet is the premise and the claim is the hypothesis. Both
//! are joined into one payload with the separator the classifier was trained
//! on, and the probability of the entailment label is the support score.

use std::sync::Arc;

use crate::collaborator::EntailmentModel;
use crate::error::ScoringError;
use crate::evidence::clamp_unit;

/// Separator understood by RoBERTa-style MNLI classifiers
pub const DEFAULT_SEPARATOR: &str = "</s></s>";

/// Scores how strongly an evidence snippet entails a claim.
#[derive(Clone)]
pub struct EntailmentScorer {
    model: Arc<dyn EntailmentModel>,
    separator: String,
}

impl EntailmentScorer {
    pub fn new(model: Arc<dyn EntailmentModel>) -> Self {
        Self::with_separator(model, DEFAULT_SEPARATOR)
    }

    pub fn with_separator(model: Arc<dyn EntailmentModel>, separator: impl Into<String>) -> Self {
        Self {
            model,
            separator: separator.into(),
        }
    }

    /// Premise first, hypothesis second.
    pub fn payload(&self, claim: &str, evidence: &str) -> String {
        format!("{} {} {}", evidence, self.separator, claim)
    }

    /// Entailment probability in [0, 1].
    ///
    /// Returns 0.0 when the classifier reports no entailment label at all.
    pub fn score(&self, claim: &str, evidence: &str) -> Result<f64, ScoringError> {
        let labels = self
            .model
            .predict(&self.payload(claim, evidence))
            .map_err(|e| ScoringError::new(claim, evidence, e))?;

        let score = labels
            .iter()
            .find(|l| l.label.to_ascii_lowercase().contains("entail"))
            .map(|l| l.score)
            .unwrap_or(0.0);

        Ok(clamp_unit(score))
    }
}
