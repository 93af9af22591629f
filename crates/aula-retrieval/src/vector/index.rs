//! Brute-force in-memory vector index.

use std::collections::HashMap;

use aula_core::errors::{AulaResult, RetrievalError};
use aula_core::models::{Chunk, MetadataFilter};
use aula_core::traits::{IVectorIndex, IndexHit};
use aula_embeddings::math;
use rayon::prelude::*;

/// Exact cosine search over every chunk, scanned in parallel.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorIndex {
    dimensions: usize,
    chunks: Vec<Chunk>,
    by_id: HashMap<String, usize>,
}

impl InMemoryVectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            chunks: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn from_chunks(
        dimensions: usize,
        chunks: impl IntoIterator<Item = Chunk>,
    ) -> AulaResult<Self> {
        let mut index = Self::new(dimensions);
        for chunk in chunks {
            index.insert(chunk)?;
        }
        Ok(index)
    }

    /// Insert or replace a chunk.
    pub fn insert(&mut self, chunk: Chunk) -> AulaResult<()> {
        if chunk.embedding.len() != self.dimensions {
            return Err(RetrievalError::DimensionMismatch {
                index: self.dimensions,
                query: chunk.embedding.len(),
            }
            .into());
        }
        match self.by_id.get(&chunk.id) {
            Some(&pos) => self.chunks[pos] = chunk,
            None => {
                self.by_id.insert(chunk.id.clone(), self.chunks.len());
                self.chunks.push(chunk);
            }
        }
        Ok(())
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

impl IVectorIndex for InMemoryVectorIndex {
    fn search(
        &self,
        vector: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> AulaResult<Vec<IndexHit>> {
        if self.chunks.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if vector.len() != self.dimensions {
            return Err(RetrievalError::DimensionMismatch {
                index: self.dimensions,
                query: vector.len(),
            }
            .into());
        }

        let mut hits: Vec<IndexHit> = self
            .chunks
            .par_iter()
            .filter(|c| filter.map_or(true, |f| f.matches(c)))
            .map(|c| IndexHit {
                chunk_id: c.id.clone(),
                similarity: math::cosine(vector, &c.embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    fn chunk(&self, id: &str) -> Option<&Chunk> {
        self.by_id.get(id).map(|&pos| &self.chunks[pos])
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
        Chunk::new(id, id, "doc", "sec", embedding)
    }

    #[test]
    fn empty_index_returns_empty() {
        let index = InMemoryVectorIndex::new(2);
        assert!(index.search(&[1.0, 0.0], 5, None).unwrap().is_empty());
    }

    #[test]
    fn search_orders_by_similarity() {
        let index = InMemoryVectorIndex::from_chunks(
            2,
            vec![
                chunk("far", vec![0.0, 1.0]),
                chunk("near", vec![1.0, 0.1]),
                chunk("exact", vec![1.0, 0.0]),
            ],
        )
        .unwrap();
        let hits = index.search(&[1.0, 0.0], 2, None).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near"]);
    }

    #[test]
    fn insert_rejects_wrong_dimensions_and_replaces_duplicates() {
        let mut index = InMemoryVectorIndex::new(2);
        assert!(index.insert(chunk("bad", vec![1.0])).is_err());
        index.insert(chunk("a", vec![1.0, 0.0])).unwrap();
        index.insert(chunk("a", vec![0.0, 1.0])).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.chunk("a").unwrap().embedding, vec![0.0, 1.0]);
    }

    #[test]
    fn query_dimension_mismatch_is_an_error() {
        let index = InMemoryVectorIndex::from_chunks(2, vec![chunk("a", vec![1.0, 0.0])]).unwrap();
        assert!(index.search(&[1.0, 0.0, 0.0], 1, None).is_err());
    }
}
