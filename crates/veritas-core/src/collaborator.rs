//! Collaborator interfaces
//!
//! The pipeline never talks to a model runtime directly. The embedding model,
//! the entailment classifier and the vector index are reached through these
//! traits so that ONNX engines, remote services and test doubles are
//! interchangeable. Implementations are shared across concurrent requests and
//! must tolerate concurrent calls.

use serde::{Deserialize, Serialize};

use crate::error::{CollabResult, CollaboratorError};

/// Encodes text into a fixed-dimension vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> CollabResult<Vec<f32>>;
}

/// Nearest-neighbour search over vectors built offline from the knowledge base.
pub trait VectorIndex: Send + Sync {
    /// Dimension of the indexed vectors.
    fn dimension(&self) -> usize;

    /// Number of indexed rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return up to `k` rows most similar to `query`, most similar first.
    fn search(&self, query: &[f32], k: usize) -> CollabResult<SearchHits>;
}

/// Natural language inference classifier.
pub trait EntailmentModel: Send + Sync {
    /// Classify a combined premise/hypothesis payload.
    fn predict(&self, payload: &str) -> CollabResult<Vec<LabelScore>>;
}

/// Parallel arrays of row ids and similarity scores returned by an index.
///
/// A row id of `-1` marks an empty slot, used by indexes that pad the result
/// to `k` when fewer rows exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub ids: Vec<i64>,
    pub scores: Vec<f32>,
}

impl SearchHits {
    pub fn new(ids: Vec<i64>, scores: Vec<f32>) -> Self {
        Self { ids, scores }
    }

    /// Zip ids with scores, rejecting mismatched arrays.
    pub fn pairs(&self) -> CollabResult<impl Iterator<Item = (i64, f32)> + '_> {
        if self.ids.len() != self.scores.len() {
            return Err(CollaboratorError::failed(format!(
                "index returned {} ids but {} scores",
                self.ids.len(),
                self.scores.len()
            )));
        }
        Ok(self.ids.iter().copied().zip(self.scores.iter().copied()))
    }
}

/// One (label, probability) pair from the entailment classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}
