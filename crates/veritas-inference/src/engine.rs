//! Inference engine for embedding generation.
//!
//! Loads a sentence-transformer ONNX model and serves the pipeline's
//! [`Embedder`] interface.

use ndarray::{Array2, ArrayView1, ArrayView2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokenizers::Tokenizer;
use tracing::{debug, info};
use veritas_core::similarity::l2_normalize;
use veritas_core::{CollabResult, CollaboratorError, Component, Embedder, NotReady};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("model not loaded")]
    ModelNotLoaded,

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("failed to load tokenizer: {0}")]
    TokenizerLoad(String),

    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Report this failure through the collaborator interface of `component`.
    pub fn into_collaborator(self, component: Component) -> CollaboratorError {
        match self {
            Self::ModelNotLoaded => NotReady(component).into(),
            other => CollaboratorError::failed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Configuration for an ONNX model and its tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the tokenizer.json file
    pub tokenizer_path: String,
    /// Maximum sequence length for tokenization
    pub max_length: usize,
    /// Whether to normalize output embeddings
    pub normalize: bool,
    /// Number of threads for inference (0 = auto)
    pub num_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            tokenizer_path: String::new(),
            max_length: 512,
            normalize: true,
            num_threads: 0,
        }
    }
}

/// Session, tokenizer and the config they were loaded from.
pub(crate) struct OnnxModel {
    pub(crate) session: Session,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) config: EngineConfig,
}

impl OnnxModel {
    pub(crate) fn load(config: EngineConfig) -> Result<Self> {
        info!(
            "Loading model from {} with tokenizer {}",
            config.model_path, config.tokenizer_path
        );

        if !Path::new(&config.model_path).exists() {
            return Err(EngineError::ModelLoad(format!(
                "model file not found: {}",
                config.model_path
            )));
        }
        if !Path::new(&config.tokenizer_path).exists() {
            return Err(EngineError::TokenizerLoad(format!(
                "tokenizer file not found: {}",
                config.tokenizer_path
            )));
        }

        let tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| EngineError::TokenizerLoad(e.to_string()))?;

        let mut session_builder = Session::builder()
            .map_err(|e| EngineError::ModelLoad(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EngineError::ModelLoad(e.to_string()))?;

        if config.num_threads > 0 {
            session_builder = session_builder
                .with_intra_threads(config.num_threads)
                .map_err(|e| EngineError::ModelLoad(e.to_string()))?;
        }

        let session = session_builder
            .commit_from_file(&config.model_path)
            .map_err(|e| EngineError::ModelLoad(e.to_string()))?;

        info!("Model loaded successfully");

        Ok(Self {
            session,
            tokenizer,
            config,
        })
    }

    /// Tokenize `texts` into padded `input_ids` and `attention_mask` tensors.
    ///
    /// Sequences are padded to the longest in the batch and truncated to
    /// `max_length`.
    pub(crate) fn encode(&self, texts: &[String]) -> Result<(Array2<i64>, Array2<i64>)> {
        if texts.is_empty() {
            return Err(EngineError::InvalidInput("empty input".to_string()));
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EngineError::Tokenization(e.to_string()))?;

        let batch_size = encodings.len();
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .clamp(1, self.config.max_length.max(1));

        let mut input_ids: Vec<i64> = Vec::with_capacity(batch_size * seq_len);
        let mut attention_mask: Vec<i64> = Vec::with_capacity(batch_size * seq_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            for i in 0..seq_len {
                if i < ids.len() {
                    input_ids.push(ids[i] as i64);
                    attention_mask.push(mask[i] as i64);
                } else {
                    input_ids.push(0); // PAD token
                    attention_mask.push(0);
                }
            }
        }

        let input_ids = Array2::from_shape_vec((batch_size, seq_len), input_ids).map_err(|e| {
            EngineError::Inference(format!("failed to create input_ids tensor: {}", e))
        })?;
        let attention_mask = Array2::from_shape_vec((batch_size, seq_len), attention_mask)
            .map_err(|e| {
                EngineError::Inference(format!("failed to create attention_mask tensor: {}", e))
            })?;

        Ok((input_ids, attention_mask))
    }
}

/// Inference engine for generating text embeddings.
pub struct EmbeddingEngine {
    model: RwLock<Option<OnnxModel>>,
}

impl EmbeddingEngine {
    /// Create a new engine (model not loaded).
    pub fn new() -> Self {
        Self {
            model: RwLock::new(None),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.read().is_some()
    }

    /// Get the current model configuration, if loaded.
    pub fn config(&self) -> Option<EngineConfig> {
        self.model.read().as_ref().map(|m| m.config.clone())
    }

    pub fn load(&self, config: EngineConfig) -> Result<()> {
        let model = OnnxModel::load(config)?;
        *self.model.write() = Some(model);
        Ok(())
    }

    /// Generate embeddings for a batch of texts.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = self.model.read();
        let model = model.as_ref().ok_or(EngineError::ModelNotLoaded)?;

        debug!("Generating embeddings for {} texts", texts.len());

        let (input_ids, attention_mask) = model.encode(texts)?;
        let batch_size = input_ids.nrows();

        let outputs = model
            .session
            .run(
                ort::inputs! {
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask.clone(),
                }
                .map_err(|e| EngineError::Inference(e.to_string()))?,
            )
            .map_err(|e| EngineError::Inference(e.to_string()))?;

        // Sentence transformers export either pooled or per-token output
        let embeddings = outputs
            .get("sentence_embedding")
            .or_else(|| outputs.get("last_hidden_state"))
            .ok_or_else(|| EngineError::Inference("no embedding output found".to_string()))?;

        let embeddings: ndarray::ArrayViewD<f32> = embeddings
            .try_extract_tensor()
            .map_err(|e| EngineError::Inference(e.to_string()))?;

        let mut result = Vec::with_capacity(batch_size);
        let shape = embeddings.shape().to_vec();
        if shape.len() == 2 {
            // [batch_size, hidden_size]
            for i in 0..batch_size {
                let embedding: Vec<f32> = embeddings
                    .slice(ndarray::s![i, ..])
                    .iter()
                    .copied()
                    .collect();
                result.push(self.finish(model, embedding));
            }
        } else if shape.len() == 3 {
            // [batch_size, seq_len, hidden_size]
            for i in 0..batch_size {
                let tokens: ArrayView2<f32> = embeddings
                    .slice(ndarray::s![i, .., ..])
                    .into_dimensionality()
                    .map_err(|e| EngineError::Inference(e.to_string()))?;
                let embedding = mean_pool(tokens, &attention_mask.row(i));
                result.push(self.finish(model, embedding));
            }
        } else {
            return Err(EngineError::Inference(format!(
                "unexpected output shape: {:?}",
                shape
            )));
        }

        Ok(result)
    }

    /// Generate embedding for a single text.
    pub fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()])?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::Inference("no embedding generated".to_string()))
    }

    fn finish(&self, model: &OnnxModel, mut embedding: Vec<f32>) -> Vec<f32> {
        if model.config.normalize {
            l2_normalize(&mut embedding);
        }
        embedding
    }
}

impl Default for EmbeddingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> CollabResult<Vec<f32>> {
        self.embed_one(text)
            .map_err(|e| e.into_collaborator(Component::Embedder))
    }
}

/// Mean pooling over token embeddings with attention mask.
pub(crate) fn mean_pool(tokens: ArrayView2<f32>, attention_mask: &ArrayView1<i64>) -> Vec<f32> {
    let hidden_size = tokens.shape()[1];
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for (i, mask) in attention_mask.iter().enumerate() {
        if *mask == 1 && i < tokens.nrows() {
            for (j, val) in tokens.row(i).iter().enumerate() {
                sum[j] += val;
            }
            count += 1.0;
        }
    }

    if count > 0.0 {
        for val in &mut sum {
            *val /= count;
        }
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn mean_pool_skips_masked_tokens() {
        let tokens = array![[1.0f32, 2.0], [3.0, 4.0], [100.0, 100.0]];
        let mask: Array1<i64> = array![1, 1, 0];
        assert_eq!(mean_pool(tokens.view(), &mask.view()), vec![2.0, 3.0]);
    }

    #[test]
    fn mean_pool_all_masked_is_zero() {
        let tokens = array![[1.0f32, 2.0]];
        let mask: Array1<i64> = array![0];
        assert_eq!(mean_pool(tokens.view(), &mask.view()), vec![0.0, 0.0]);
    }

    #[test]
    fn unloaded_engine_is_not_ready() {
        let engine = EmbeddingEngine::new();
        assert!(!engine.is_loaded());
        assert!(engine.config().is_none());
        assert_eq!(
            Embedder::embed(&engine, "Albert Einstein was born in 1879."),
            Err(CollaboratorError::NotReady(NotReady(Component::Embedder)))
        );
    }

    #[test]
    fn missing_model_file_fails_to_load() {
        let engine = EmbeddingEngine::new();
        let err = engine
            .load(EngineConfig {
                model_path: "/nonexistent/model.onnx".to_string(),
                tokenizer_path: "/nonexistent/tokenizer.json".to_string(),
                ..EngineConfig::default()
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::ModelLoad(_)));
        assert!(!engine.is_loaded());
    }

    #[test]
    fn other_engine_errors_become_failures() {
        let err = EngineError::Inference("bad shape".to_string())
            .into_collaborator(Component::EntailmentModel);
        assert_eq!(err, CollaboratorError::failed("inference failed: bad shape"));
    }
}
