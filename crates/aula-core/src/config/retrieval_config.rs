use serde::{Deserialize, Serialize};

use super::defaults;

/// Which retrievers participate in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    #[default]
    Hybrid,
    VectorOnly,
    GraphOnly,
}

/// Vector retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of evidence chunks returned per retriever.
    pub top_k: usize,
    /// Which retrievers run.
    pub mode: RetrievalMode,
    /// Enable Maximal Marginal Relevance re-ranking.
    pub use_mmr: bool,
    /// MMR redundancy penalty λ in `sim(query) − λ·max sim(candidate, selected)`.
    pub mmr_lambda: f64,
    /// Over-fetch multiplier applied to `top_k` before MMR and post-filtering.
    pub overfetch_factor: usize,
    /// Cosine similarity floor; hits below it are dropped.
    pub min_similarity: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_TOP_K,
            mode: RetrievalMode::default(),
            use_mmr: defaults::DEFAULT_USE_MMR,
            mmr_lambda: defaults::DEFAULT_MMR_LAMBDA,
            overfetch_factor: defaults::DEFAULT_OVERFETCH_FACTOR,
            min_similarity: defaults::DEFAULT_MIN_SIMILARITY,
        }
    }
}
