//! Veritas Core Engine
//!
//! Evidence-backed fact checking for short passages. A passage is split into
//! factual claims, each claim is matched against a knowledge base of snippets
//! through an embedding index, every retrieved snippet is scored for
//! entailment, and per-claim verdicts are combined into one passage verdict.
//!
//! Model runtimes stay outside this crate: the embedder, the entailment
//! classifier and the vector index are [`collaborator`] traits installed into
//! a [`ModelContext`].
//!
//! # Example
//!
//! ```rust
//! use veritas_core::claim::ClaimExtractor;
//!
//! let claims = ClaimExtractor::default().extract(
//!     "Albert Einstein was born in 1879. The Eiffel Tower was completed in 1889.",
//! );
//! assert_eq!(claims.len(), 2);
//! assert_eq!(claims[0].text, "Albert Einstein was born in 1879.");
//! ```

pub mod assess;
pub mod cache;
pub mod claim;
pub mod collaborator;
pub mod config;
pub mod context;
pub mod entailment;
pub mod error;
pub mod evidence;
pub mod pipeline;
pub mod similarity;
pub mod validate;
pub mod verdict;

// Re-export main types at crate root
pub use assess::{Assessment, ClaimAssessor};
pub use cache::{cache_key, CacheStats, Clock, ManualClock, ResultCache, SystemClock};
pub use claim::{Claim, ClaimExtractor};
pub use collaborator::{Embedder, EntailmentModel, LabelScore, SearchHits, VectorIndex};
pub use config::{CacheConfig, ConfigError, PipelineConfig, ValidationConfig};
pub use context::{ModelContext, Readiness};
pub use entailment::EntailmentScorer;
pub use error::{
    AssessError, ClassifyError, CollabResult, CollaboratorError, Component, NotReady,
    RetrievalError, ScoringError, ValidationError,
};
pub use evidence::{
    EvidenceItem, EvidenceRetriever, FlatIndex, IndexError, KnowledgeBase, KnowledgeBaseError,
    ScoredEvidence, SnippetRecord,
};
pub use pipeline::FactChecker;
pub use validate::InputValidator;
pub use verdict::{ClaimVerdict, Classification, OverallVerdict, Thresholds, VerdictAggregator};
