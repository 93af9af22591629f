/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("no evidence found for query")]
    NoEvidence,

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("index dimension mismatch: index has {index}, query has {query}")]
    DimensionMismatch { index: usize, query: usize },

    #[error("unknown chunk: {chunk_id}")]
    UnknownChunk { chunk_id: String },
}
