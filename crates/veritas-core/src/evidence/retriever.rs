//! Claim → evidence retrieval

use std::sync::Arc;

use tracing::debug;

use super::{EvidenceItem, KnowledgeBase};
use crate::collaborator::{Embedder, VectorIndex};
use crate::error::{CollaboratorError, RetrievalError};
use crate::similarity::l2_normalize;

pub const DEFAULT_TOP_K: usize = 6;

/// Embeds a claim and maps its nearest index rows to knowledge-base snippets.
#[derive(Clone)]
pub struct EvidenceRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    knowledge_base: Arc<KnowledgeBase>,
}

impl EvidenceRetriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        knowledge_base: Arc<KnowledgeBase>,
    ) -> Self {
        Self {
            embedder,
            index,
            knowledge_base,
        }
    }

    /// Retrieve up to `k` evidence items, most similar first.
    ///
    /// Collaborator failures are errors, never an empty result.
    pub fn retrieve(&self, claim: &str, k: usize) -> Result<Vec<EvidenceItem>, RetrievalError> {
        let fail = |source: CollaboratorError| RetrievalError::new(claim, k, source);

        let mut query = self.embedder.embed(claim).map_err(fail)?;
        if query.len() != self.index.dimension() {
            return Err(fail(CollaboratorError::failed(format!(
                "embedding dimension {} does not match index dimension {}",
                query.len(),
                self.index.dimension()
            ))));
        }
        l2_normalize(&mut query);

        let hits = self.index.search(&query, k).map_err(fail)?;

        let mut items = Vec::with_capacity(k);
        for (row, score) in hits.pairs().map_err(fail)? {
            if row < 0 {
                continue;
            }
            let record = self.knowledge_base.get(row as usize).ok_or_else(|| {
                fail(CollaboratorError::failed(format!(
                    "index row {} is outside the knowledge base ({} records)",
                    row,
                    self.knowledge_base.len()
                )))
            })?;
            items.push(EvidenceItem::new(record, score as f64));
        }

        debug!("Retrieved {} evidence items (k={})", items.len(), k);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::SearchHits;
    use crate::error::{CollabResult, Component, NotReady};
    use crate::evidence::{FlatIndex, SnippetRecord};

    struct FixedEmbedder(Vec<f32>);

    impl Embedder for FixedEmbedder {
        fn embed(&self, _text: &str) -> CollabResult<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct UnloadedEmbedder;

    impl Embedder for UnloadedEmbedder {
        fn embed(&self, _text: &str) -> CollabResult<Vec<f32>> {
            Err(NotReady(Component::Embedder).into())
        }
    }

    /// Returns canned hits regardless of the query.
    struct CannedIndex(SearchHits);

    impl VectorIndex for CannedIndex {
        fn dimension(&self) -> usize {
            2
        }
        fn len(&self) -> usize {
            self.0.ids.len()
        }
        fn search(&self, _query: &[f32], _k: usize) -> CollabResult<SearchHits> {
            Ok(self.0.clone())
        }
    }

    fn kb() -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::from_records(vec![
            SnippetRecord {
                snippet: "Einstein was born in Ulm in 1879.".to_string(),
                source: "https://en.wikipedia.org/wiki/Albert_Einstein".to_string(),
            },
            SnippetRecord {
                snippet: "Python is a programming language.".to_string(),
                source: "https://en.wikipedia.org/wiki/Python_(programming_language)".to_string(),
            },
            SnippetRecord {
                snippet: "Water boils at 100 degrees Celsius.".to_string(),
                source: "https://en.wikipedia.org/wiki/Water".to_string(),
            },
        ]))
    }

    fn flat_index() -> Arc<dyn VectorIndex> {
        Arc::new(FlatIndex::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.8, 0.6]]).unwrap())
    }

    #[test]
    fn maps_rows_to_snippets_in_similarity_order() {
        // Unnormalized query; the retriever normalizes before searching
        let retriever =
            EvidenceRetriever::new(Arc::new(FixedEmbedder(vec![3.0, 0.0])), flat_index(), kb());
        let items = retriever.retrieve("Einstein was born in 1879.", 2).unwrap();

        assert_eq!(items.len(), 2);
        assert!(items[0].snippet.starts_with("Einstein"));
        assert!((items[0].retrieval_score - 1.0).abs() < 1e-6);
        assert!(items[1].snippet.starts_with("Water"));
        assert!((items[1].retrieval_score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn padded_rows_are_skipped() {
        let index = CannedIndex(SearchHits::new(vec![1, -1, -1], vec![0.9, 0.0, 0.0]));
        let retriever =
            EvidenceRetriever::new(Arc::new(FixedEmbedder(vec![0.0, 1.0])), Arc::new(index), kb());
        let items = retriever.retrieve("Python is a language.", 3).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].snippet.starts_with("Python"));
    }

    #[test]
    fn row_outside_store_is_error() {
        let index = CannedIndex(SearchHits::new(vec![7], vec![0.9]));
        let retriever =
            EvidenceRetriever::new(Arc::new(FixedEmbedder(vec![0.0, 1.0])), Arc::new(index), kb());
        let err = retriever.retrieve("claim", 6).unwrap_err();
        assert_eq!(err.top_k, 6);
        assert!(err.to_string().contains("row 7"));
    }

    #[test]
    fn mismatched_hit_arrays_are_error() {
        let index = CannedIndex(SearchHits::new(vec![0, 1], vec![0.9]));
        let retriever =
            EvidenceRetriever::new(Arc::new(FixedEmbedder(vec![0.0, 1.0])), Arc::new(index), kb());
        assert!(retriever.retrieve("claim", 2).is_err());
    }

    #[test]
    fn embedding_dimension_mismatch_is_error() {
        let retriever = EvidenceRetriever::new(
            Arc::new(FixedEmbedder(vec![1.0, 0.0, 0.0])),
            flat_index(),
            kb(),
        );
        assert!(retriever.retrieve("claim", 2).is_err());
    }

    #[test]
    fn unloaded_embedder_propagates_not_ready() {
        let retriever = EvidenceRetriever::new(Arc::new(UnloadedEmbedder), flat_index(), kb());
        let err = retriever.retrieve("claim", 2).unwrap_err();
        assert_eq!(
            err.source,
            CollaboratorError::NotReady(NotReady(Component::Embedder))
        );
    }

    #[test]
    fn negative_similarity_is_clamped() {
        let retriever =
            EvidenceRetriever::new(Arc::new(FixedEmbedder(vec![-1.0, 0.0])), flat_index(), kb());
        let items = retriever.retrieve("claim", 3).unwrap();
        assert!(items.iter().all(|i| (0.0..=1.0).contains(&i.retrieval_score)));
    }
}
