use crate::errors::AulaResult;
use crate::models::{Chunk, ChunkId, MetadataFilter};

/// A nearest-neighbor hit.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub chunk_id: ChunkId,
    /// Cosine similarity in [-1, 1].
    pub similarity: f64,
}

/// Read-only vector index over chunk embeddings.
pub trait IVectorIndex: Send + Sync {
    /// Up to `k` hits ordered by descending similarity.
    fn search(
        &self,
        vector: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> AulaResult<Vec<IndexHit>>;

    fn chunk(&self, id: &str) -> Option<&Chunk>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dimensions(&self) -> usize;
}
