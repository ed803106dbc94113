//! Threshold classification and pessimistic aggregation

use super::{ClaimVerdict, Classification, OverallVerdict};
use crate::assess::Assessment;
use crate::config::ConfigError;
use crate::evidence::clamp_unit;

pub const DEFAULT_TRUTH_THRESHOLD: f64 = 0.85;
pub const DEFAULT_FALSEHOOD_THRESHOLD: f64 = 0.40;

/// Support thresholds; `truth` must be strictly above `falsehood`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    truth: f64,
    falsehood: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            truth: DEFAULT_TRUTH_THRESHOLD,
            falsehood: DEFAULT_FALSEHOOD_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn new(truth: f64, falsehood: f64) -> Result<Self, ConfigError> {
        for (name, value) in [("truth_threshold", truth), ("falsehood_threshold", falsehood)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if truth <= falsehood {
            return Err(ConfigError::Invalid(format!(
                "truth_threshold ({}) must be greater than falsehood_threshold ({})",
                truth, falsehood
            )));
        }
        Ok(Self { truth, falsehood })
    }

    pub fn truth(&self) -> f64 {
        self.truth
    }

    pub fn falsehood(&self) -> f64 {
        self.falsehood
    }
}

/// Turns assessments into claim verdicts and claim verdicts into a passage verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerdictAggregator {
    thresholds: Thresholds,
}

impl VerdictAggregator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Classify a support score and derive its confidence.
    pub fn classify_support(&self, support: f64) -> (Classification, f64) {
        let support = clamp_unit(support);
        if support >= self.thresholds.truth {
            (Classification::Truth, support)
        } else if support < self.thresholds.falsehood {
            (Classification::Falsehood, clamp_unit(1.0 - support))
        } else {
            (Classification::Neutral, support)
        }
    }

    pub fn claim_verdict(&self, assessment: Assessment) -> ClaimVerdict {
        let (classification, confidence) = self.classify_support(assessment.support);
        ClaimVerdict {
            claim: assessment.claim,
            classification,
            confidence,
            best_evidence: assessment.best_evidence,
        }
    }

    /// Combine claim verdicts, most pessimistic class first.
    ///
    /// Confidence is the mean over the claims of the winning class. A passage
    /// without claims is Neutral with confidence 0.0.
    pub fn aggregate(&self, claims: Vec<ClaimVerdict>) -> OverallVerdict {
        let (classification, confidence) = if claims.is_empty() {
            (Classification::Neutral, 0.0)
        } else {
            let winner = [Classification::Falsehood, Classification::Neutral]
                .into_iter()
                .find(|c| claims.iter().any(|v| v.classification == *c))
                .unwrap_or(Classification::Truth);
            (winner, mean_confidence(&claims, winner))
        };

        OverallVerdict {
            classification,
            confidence: clamp_unit(confidence),
            claims,
        }
    }
}

fn mean_confidence(claims: &[ClaimVerdict], class: Classification) -> f64 {
    let (sum, count) = claims
        .iter()
        .filter(|v| v.classification == class)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v.confidence, n + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
