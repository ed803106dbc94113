//! Evidence retrieval
//!
//! The knowledge base is an ordered, immutable array of snippet records built
//! offline. The vector index was built from the same array, so an index row id
//! is a position in the knowledge base. Neither side is ever updated in place.

mod index;
mod retriever;
mod store;
mod types;

pub use index::{read_fvecs, FlatIndex, IndexError};
pub use retriever::{EvidenceRetriever, DEFAULT_TOP_K};
pub use store::{KnowledgeBase, KnowledgeBaseError};
pub use types::{clamp_unit, EvidenceItem, ScoredEvidence, SnippetRecord};
