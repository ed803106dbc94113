//! Error types for the fact-checking pipeline

use std::time::Duration;

use thiserror::Error;

/// Maximum number of characters of claim or evidence text carried in errors.
const CONTEXT_CHARS: usize = 50;

/// A shared collaborator the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Embedder,
    EntailmentModel,
    VectorIndex,
    KnowledgeBase,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedder => write!(f, "embedding model"),
            Self::EntailmentModel => write!(f, "entailment model"),
            Self::VectorIndex => write!(f, "vector index"),
            Self::KnowledgeBase => write!(f, "knowledge base"),
        }
    }
}

/// A required collaborator has not finished initializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is not ready")]
pub struct NotReady(pub Component);

/// Failure reported by a collaborator (embedding model, classifier, index).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorError {
    /// The collaborator exists but its model is not loaded
    #[error(transparent)]
    NotReady(#[from] NotReady),

    /// The call itself failed
    #[error("{0}")]
    Failed(String),
}

impl CollaboratorError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Result type for collaborator calls
pub type CollabResult<T> = Result<T, CollaboratorError>;

/// Evidence retrieval failed for a claim.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("evidence retrieval failed for claim '{claim}' (top_k={top_k}): {source}")]
pub struct RetrievalError {
    /// Claim text, truncated
    pub claim: String,
    pub top_k: usize,
    #[source]
    pub source: CollaboratorError,
}

impl RetrievalError {
    pub fn new(claim: &str, top_k: usize, source: CollaboratorError) -> Self {
        Self {
            claim: truncate(claim),
            top_k,
            source,
        }
    }
}

/// Entailment scoring failed for a (claim, evidence) pair.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("entailment scoring failed for claim '{claim}' against '{evidence}': {source}")]
pub struct ScoringError {
    /// Claim text, truncated
    pub claim: String,
    /// Evidence snippet, truncated
    pub evidence: String,
    #[source]
    pub source: CollaboratorError,
}

impl ScoringError {
    pub fn new(claim: &str, evidence: &str, source: CollaboratorError) -> Self {
        Self {
            claim: truncate(claim),
            evidence: truncate(evidence),
            source,
        }
    }
}

/// Why the input text was rejected before the pipeline ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text is too short: {len} characters, minimum is {min}")]
    TooShort { len: usize, min: usize },

    #[error("text is too long: {len} characters, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("text has {words} words, minimum is {min}")]
    TooFewWords { words: usize, min: usize },

    #[error("text contains a disallowed pattern: {0}")]
    UnsafeContent(String),
}

/// Failure while assessing a single claim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// The request deadline passed before the assessment finished
    #[error("deadline exceeded while assessing claim")]
    DeadlineExceeded,
}

/// Errors surfaced by [`crate::FactChecker::classify`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("service unavailable: {0}")]
    ModelsNotReady(Component),

    #[error(transparent)]
    Retrieval(RetrievalError),

    #[error(transparent)]
    Scoring(ScoringError),

    #[error("classification timed out after {0:?}")]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ClassifyError {
    /// Whether a caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelsNotReady(_) | Self::Timeout(_))
    }
}

impl From<NotReady> for ClassifyError {
    fn from(e: NotReady) -> Self {
        Self::ModelsNotReady(e.0)
    }
}

impl From<RetrievalError> for ClassifyError {
    fn from(e: RetrievalError) -> Self {
        match e.source {
            CollaboratorError::NotReady(NotReady(c)) => Self::ModelsNotReady(c),
            CollaboratorError::Failed(_) => Self::Retrieval(e),
        }
    }
}

impl From<ScoringError> for ClassifyError {
    fn from(e: ScoringError) -> Self {
        match e.source {
            CollaboratorError::NotReady(NotReady(c)) => Self::ModelsNotReady(c),
            CollaboratorError::Failed(_) => Self::Scoring(e),
        }
    }
}

/// Truncate to [`CONTEXT_CHARS`] characters on a char boundary.
pub(crate) fn truncate(text: &str) -> String {
    match text.char_indices().nth(CONTEXT_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
