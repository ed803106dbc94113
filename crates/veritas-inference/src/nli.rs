//! Natural language inference engine.
//!
//! Runs an MNLI-style sequence classifier over a premise/hypothesis payload
//! and reports a probability per label.

use ndarray::ArrayViewD;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use veritas_core::{CollabResult, Component, EntailmentModel, LabelScore};

use crate::engine::{EngineConfig, EngineError, OnnxModel, Result};

/// Output label order of roberta-large-mnli.
pub const DEFAULT_LABELS: [&str; 3] = ["CONTRADICTION", "NEUTRAL", "ENTAILMENT"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NliConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    /// Label for each logit, in output order
    pub labels: Vec<String>,
}

impl Default for NliConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

struct LoadedClassifier {
    model: OnnxModel,
    labels: Vec<String>,
}

/// Entailment classifier backed by an ONNX sequence-classification model.
pub struct EntailmentEngine {
    classifier: RwLock<Option<LoadedClassifier>>,
}

impl EntailmentEngine {
    pub fn new() -> Self {
        Self {
            classifier: RwLock::new(None),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.read().is_some()
    }

    pub fn load(&self, config: NliConfig) -> Result<()> {
        if config.labels.is_empty() {
            return Err(EngineError::InvalidInput(
                "entailment model needs at least one label".to_string(),
            ));
        }
        let model = OnnxModel::load(config.engine)?;
        info!("Entailment labels: {}", config.labels.join(", "));
        *self.classifier.write() = Some(LoadedClassifier {
            model,
            labels: config.labels,
        });
        Ok(())
    }

    /// Classify one payload and return every label with its probability.
    pub fn classify(&self, payload: &str) -> Result<Vec<LabelScore>> {
        let classifier = self.classifier.read();
        let classifier = classifier.as_ref().ok_or(EngineError::ModelNotLoaded)?;
        let model = &classifier.model;

        let (input_ids, attention_mask) = model.encode(&[payload.to_string()])?;

        let outputs = model
            .session
            .run(
                ort::inputs! {
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                }
                .map_err(|e| EngineError::Inference(e.to_string()))?,
            )
            .map_err(|e| EngineError::Inference(e.to_string()))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| EngineError::Inference("no logits output found".to_string()))?;
        let logits: ArrayViewD<f32> = logits
            .try_extract_tensor()
            .map_err(|e| EngineError::Inference(e.to_string()))?;

        let logits: Vec<f32> = logits.iter().copied().collect();
        if logits.len() != classifier.labels.len() {
            return Err(EngineError::Inference(format!(
                "model produced {} logits for {} labels",
                logits.len(),
                classifier.labels.len()
            )));
        }

        let scores = label_scores(&classifier.labels, &softmax(&logits));
        debug!("Entailment scores: {:?}", scores);
        Ok(scores)
    }
}

impl Default for EntailmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EntailmentModel for EntailmentEngine {
    fn predict(&self, payload: &str) -> CollabResult<Vec<LabelScore>> {
        self.classify(payload)
            .map_err(|e| e.into_collaborator(Component::EntailmentModel))
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = logits.iter().map(|&x| (x as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

fn label_scores(labels: &[String], probabilities: &[f64]) -> Vec<LabelScore> {
    labels
        .iter()
        .zip(probabilities)
        .map(|(label, p)| LabelScore::new(label.clone(), *p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::{CollaboratorError, NotReady};

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn softmax_handles_large_logits() {
        let p = softmax(&[1000.0, 1000.0]);
        assert!((p[0] - 0.5).abs() < 1e-9);
        assert!((p[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn labels_follow_output_order() {
        let labels: Vec<String> = DEFAULT_LABELS.iter().map(|l| l.to_string()).collect();
        let scores = label_scores(&labels, &[0.1, 0.2, 0.7]);
        assert_eq!(scores[2], LabelScore::new("ENTAILMENT", 0.7));
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn unloaded_engine_is_not_ready() {
        let engine = EntailmentEngine::new();
        assert_eq!(
            engine.predict("premise </s></s> hypothesis"),
            Err(CollaboratorError::NotReady(NotReady(Component::EntailmentModel)))
        );
    }

    #[test]
    fn empty_label_set_is_rejected() {
        let engine = EntailmentEngine::new();
        let err = engine
            .load(NliConfig {
                labels: Vec::new(),
                ..NliConfig::default()
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
}
