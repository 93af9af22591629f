use serde::{Deserialize, Serialize};

use super::defaults;
use crate::query_type::QueryType;

/// Per-source multipliers applied to RRF contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    pub vector: f64,
    pub graph: f64,
}

impl SourceWeights {
    pub const fn new(vector: f64, graph: f64) -> Self {
        Self { vector, graph }
    }

    pub const fn equal() -> Self {
        Self::new(0.5, 0.5)
    }
}

/// Hybrid fusion configuration. Weights are keyed by query type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// RRF smoothing constant.
    pub rrf_k: u32,
    pub factual: SourceWeights,
    pub procedural: SourceWeights,
    pub comparative: SourceWeights,
    pub out_of_domain: SourceWeights,
    pub unclassified: SourceWeights,
}

impl FusionConfig {
    /// Weights for a classified query.
    pub fn weights_for(&self, query_type: QueryType) -> SourceWeights {
        match query_type {
            QueryType::Factual => self.factual,
            QueryType::Procedural => self.procedural,
            QueryType::Comparative => self.comparative,
            QueryType::OutOfDomain => self.out_of_domain,
            QueryType::Unclassified => self.unclassified,
        }
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            factual: SourceWeights::new(0.7, 0.3),
            procedural: SourceWeights::new(0.6, 0.4),
            comparative: SourceWeights::new(0.3, 0.7),
            out_of_domain: SourceWeights::equal(),
            unclassified: SourceWeights::equal(),
        }
    }
}
