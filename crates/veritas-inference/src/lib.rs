//! Veritas Inference Library
//!
//! ONNX-backed collaborators for the Veritas pipeline: a sentence embedding
//! engine and an NLI entailment classifier, plus settings and startup loading.

pub mod engine;
pub mod loader;
pub mod nli;
pub mod settings;

pub use engine::{EmbeddingEngine, EngineConfig, EngineError};
pub use loader::{load_context, load_data};
pub use nli::{softmax, EntailmentEngine, NliConfig, DEFAULT_LABELS};
pub use settings::{DataPaths, Settings};
