//! Read-only snippet store

use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::SnippetRecord;

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid knowledge base {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered snippet records; position `i` corresponds to index row `i`.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    records: Vec<SnippetRecord>,
}

impl KnowledgeBase {
    pub fn from_records(records: Vec<SnippetRecord>) -> Self {
        Self { records }
    }

    /// Load a JSON array of `{snippet, source}` objects.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, KnowledgeBaseError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path_str.clone(),
            source,
        })?;
        let records: Vec<SnippetRecord> =
            serde_json::from_str(&raw).map_err(|source| KnowledgeBaseError::Parse {
                path: path_str.clone(),
                source,
            })?;

        info!("Loaded knowledge base from {} ({} snippets)", path_str, records.len());
        Ok(Self::from_records(records))
    }

    pub fn get(&self, row: usize) -> Option<&SnippetRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
