//! Vector retrieval: over-fetch, post-filter, similarity floor, MMR.

use std::sync::Arc;

use aula_core::config::RetrievalConfig;
use aula_core::errors::AulaResult;
use aula_core::models::{MetadataFilter, RetrievalResult};
use aula_core::traits::IVectorIndex;
use tracing::debug;

use super::mmr::{self, MmrCandidate};

/// Per-request overrides of the configured retrieval behavior.
#[derive(Debug, Clone)]
pub struct VectorOptions {
    pub filter: Option<MetadataFilter>,
    pub use_mmr: bool,
    pub mmr_lambda: f64,
    pub min_similarity: f64,
    pub overfetch_factor: usize,
}

impl VectorOptions {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            filter: None,
            use_mmr: config.use_mmr,
            mmr_lambda: config.mmr_lambda,
            min_similarity: config.min_similarity,
            overfetch_factor: config.overfetch_factor.max(1),
        }
    }

    pub fn with_filter(mut self, filter: Option<MetadataFilter>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }
}

impl Default for VectorOptions {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

/// Read-only nearest-neighbor retriever over an [`IVectorIndex`].
pub struct VectorRetriever {
    index: Arc<dyn IVectorIndex>,
}

impl VectorRetriever {
    pub fn new(index: Arc<dyn IVectorIndex>) -> Self {
        Self { index }
    }

    /// Up to `k` chunks ranked by cosine similarity to `embedding`.
    ///
    /// Fetches `k × overfetch_factor` hits once, then applies the metadata
    /// filter and similarity floor to that pool without re-querying.
    pub fn retrieve(
        &self,
        embedding: &[f32],
        k: usize,
        options: &VectorOptions,
    ) -> AulaResult<Vec<RetrievalResult>> {
        if k == 0 || self.index.is_empty() {
            return Ok(Vec::new());
        }

        let fetch = k.saturating_mul(options.overfetch_factor.max(1));
        let hits = self.index.search(embedding, fetch, None)?;
        let fetched = hits.len();

        let pool: Vec<_> = hits
            .into_iter()
            .filter(|h| h.similarity >= options.min_similarity)
            .filter_map(|h| {
                let chunk = self.index.chunk(&h.chunk_id)?;
                let keep = options.filter.as_ref().map_or(true, |f| f.matches(chunk));
                keep.then_some((h, chunk))
            })
            .collect();

        let order: Vec<usize> = if options.use_mmr && pool.len() > 1 {
            let candidates: Vec<MmrCandidate<'_>> = pool
                .iter()
                .map(|(h, c)| MmrCandidate {
                    embedding: &c.embedding,
                    relevance: h.similarity,
                })
                .collect();
            mmr::select(&candidates, k, options.mmr_lambda)
        } else {
            (0..pool.len().min(k)).collect()
        };

        debug!(
            fetched,
            kept = pool.len(),
            returned = order.len(),
            mmr = options.use_mmr,
            "vector retrieval"
        );

        Ok(order
            .into_iter()
            .enumerate()
            .map(|(rank, i)| {
                let (hit, _) = &pool[i];
                RetrievalResult::vector(hit.chunk_id.clone(), hit.similarity, rank + 1)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use aula_core::models::{Chunk, ChunkMetadata, DocumentType};

    use super::*;
    use crate::vector::InMemoryVectorIndex;

    fn chunk(id: &str, embedding: Vec<f32>, program: &str) -> Chunk {
        Chunk::new(id, id, "doc", "sec", embedding).with_metadata(ChunkMetadata {
            programs: vec![program.to_string()],
            doc_type: DocumentType::Program,
        })
    }

    fn retriever() -> VectorRetriever {
        let index = InMemoryVectorIndex::from_chunks(
            2,
            vec![
                chunk("ceia-1", vec![1.0, 0.0], "CEIA"),
                chunk("ceia-2", vec![0.99, 0.05], "CEIA"),
                chunk("mia-1", vec![0.95, 0.3], "MIA"),
                chunk("off", vec![-1.0, 0.0], "MIA"),
            ],
        )
        .unwrap();
        VectorRetriever::new(Arc::new(index))
    }

    #[test]
    fn ranks_are_one_based_and_contiguous() {
        let options = VectorOptions {
            use_mmr: false,
            ..Default::default()
        };
        let results = retriever().retrieve(&[1.0, 0.0], 3, &options).unwrap();
        let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(results[0].chunk_id, "ceia-1");
    }

    #[test]
    fn similarity_floor_drops_unrelated_chunks() {
        let results = retriever()
            .retrieve(&[1.0, 0.0], 10, &VectorOptions::default())
            .unwrap();
        assert!(results.iter().all(|r| r.chunk_id != "off"));
    }

    #[test]
    fn program_filter_applies_after_fetch() {
        let options = VectorOptions::default().with_filter(Some(MetadataFilter {
            programs: vec!["MIA".into()],
            ..Default::default()
        }));
        let results = retriever().retrieve(&[1.0, 0.0], 2, &options).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["mia-1"]);
    }

    #[test]
    fn mmr_prefers_diverse_second_pick() {
        let query = [1.0, 0.2];
        let plain = VectorOptions {
            use_mmr: false,
            ..Default::default()
        };
        let results = retriever().retrieve(&query, 2, &plain).unwrap();
        assert_eq!(results[0].chunk_id, "mia-1");
        assert_eq!(results[1].chunk_id, "ceia-2");

        let diverse = VectorOptions {
            mmr_lambda: 1.0,
            ..Default::default()
        };
        let results = retriever().retrieve(&query, 2, &diverse).unwrap();
        assert_eq!(results[0].chunk_id, "mia-1");
        assert_eq!(results[1].chunk_id, "ceia-1");
    }

    #[test]
    fn empty_index_is_not_an_error() {
        let r = VectorRetriever::new(Arc::new(InMemoryVectorIndex::new(2)));
        assert!(r.retrieve(&[1.0, 0.0], 5, &VectorOptions::default()).unwrap().is_empty());
    }
}
