//! Exact inner-product index
//!
//! Brute-force search over unit vectors, loaded from the `.fvecs` file written
//! by the offline knowledge-base build. Each `.fvecs` record is a little-endian
//! `i32` dimension followed by that many little-endian `f32` values. Rows are
//! stored in knowledge-base order.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::collaborator::{SearchHits, VectorIndex};
use crate::error::{CollabResult, CollaboratorError};
use crate::similarity::dot;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read index {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid index data: {0}")]
    Format(String),
}

/// In-memory flat index scored by inner product.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    /// Row-major, `len * dimension` values
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build from rows that all share one non-zero dimension.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        let dimension = rows.first().map(|r| r.len()).unwrap_or(0);
        if dimension == 0 {
            return Err(IndexError::Format("index has no vectors".to_string()));
        }

        let mut data = Vec::with_capacity(rows.len() * dimension);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dimension {
                return Err(IndexError::Format(format!(
                    "row {} has dimension {}, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self { dimension, data })
    }

    /// Load rows from an `.fvecs` file.
    pub fn load_fvecs(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let index = Self::from_rows(read_fvecs(&bytes)?)?;
        info!(
            "Loaded vector index from {} ({} rows, dimension {})",
            path.display(),
            index.len(),
            index.dimension
        );
        Ok(index)
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dimension..(i + 1) * self.dimension]
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    fn search(&self, query: &[f32], k: usize) -> CollabResult<SearchHits> {
        if query.len() != self.dimension {
            return Err(CollaboratorError::failed(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = (0..self.len())
            .map(|i| (i, dot(query, self.row(i))))
            .collect();
        // Highest score first; equal scores keep the lower row id first
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        let (ids, scores) = scored.into_iter().map(|(i, s)| (i as i64, s)).unzip();
        Ok(SearchHits::new(ids, scores))
    }
}

/// Decode `.fvecs` bytes into rows.
pub fn read_fvecs(bytes: &[u8]) -> Result<Vec<Vec<f32>>, IndexError> {
    let mut rows = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let header = bytes
            .get(offset..offset + 4)
            .ok_or_else(|| IndexError::Format(format!("truncated header at byte {}", offset)))?;
        let dim = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if dim <= 0 {
            return Err(IndexError::Format(format!(
                "invalid dimension {} at byte {}",
                dim, offset
            )));
        }
        offset += 4;

        let len = dim as usize * 4;
        let body = bytes
            .get(offset..offset + len)
            .ok_or_else(|| IndexError::Format(format!("truncated vector at byte {}", offset)))?;
        rows.push(
            body.chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        );
        offset += len;
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(rows: &[Vec<f32>]) -> Vec<u8> {
        let mut out = Vec::new();
        for row in rows {
            out.extend_from_slice(&(row.len() as i32).to_le_bytes());
            for v in row {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out
    }

    fn index() -> FlatIndex {
        FlatIndex::from_rows(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.6, 0.8],
            vec![0.8, 0.6],
        ])
        .unwrap()
    }

    #[test]
    fn search_orders_by_similarity() {
        let hits = index().search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(hits.ids, vec![0, 3, 2]);
        assert!((hits.scores[0] - 1.0).abs() < 1e-6);
        assert!((hits.scores[1] - 0.8).abs() < 1e-6);
        assert!((hits.scores[2] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn k_larger_than_index_returns_all_rows() {
        let hits = index().search(&[0.0, 1.0], 10).unwrap();
        assert_eq!(hits.ids.len(), 4);
        assert_eq!(hits.ids[0], 1);
    }

    #[test]
    fn ties_keep_lower_row_first() {
        let idx = FlatIndex::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let hits = idx.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits.ids, vec![1, 2]);
    }

    #[test]
    fn dimension_mismatch_is_collaborator_error() {
        assert!(index().search(&[1.0, 0.0, 0.0], 2).is_err());
    }

    #[test]
    fn fvecs_round_trip_via_file() {
        let rows = vec![vec![0.5, 0.5, 0.0], vec![0.0, 0.0, 1.0]];
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), encode(&rows)).unwrap();

        let idx = FlatIndex::load_fvecs(file.path()).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.dimension(), 3);
        assert_eq!(idx.row(1), &[0.0f32, 0.0, 1.0]);
    }

    #[test]
    fn truncated_fvecs_rejected() {
        let mut bytes = encode(&[vec![1.0, 2.0]]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(read_fvecs(&bytes), Err(IndexError::Format(_))));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = FlatIndex::from_rows(vec![vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn empty_index_rejected() {
        assert!(FlatIndex::from_rows(Vec::new()).is_err());
    }
}
