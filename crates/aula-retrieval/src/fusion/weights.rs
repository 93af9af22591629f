//! Query type → per-source fusion weights.

use std::collections::HashMap;

use aula_core::config::{FusionConfig, SourceWeights};
use aula_core::models::Provenance;
use aula_core::QueryType;

/// Weight table keyed by [`QueryType`]. Every weight is positive.
#[derive(Debug, Clone)]
pub struct FusionWeights {
    weights: HashMap<QueryType, SourceWeights>,
}

impl FusionWeights {
    pub fn from_config(config: &FusionConfig) -> Self {
        let weights = QueryType::ALL
            .iter()
            .map(|&t| (t, config.weights_for(t)))
            .collect();
        Self { weights }
    }

    pub fn for_query(&self, query_type: QueryType) -> SourceWeights {
        self.weights
            .get(&query_type)
            .copied()
            .unwrap_or_else(SourceWeights::equal)
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self::from_config(&FusionConfig::default())
    }
}

/// Multiplier for one provenance.
pub fn weight_of(weights: SourceWeights, provenance: Provenance) -> f64 {
    match provenance {
        Provenance::Vector => weights.vector,
        Provenance::Graph => weights.graph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclassified_is_equal_weighted() {
        let w = FusionWeights::default().for_query(QueryType::Unclassified);
        assert_eq!(w.vector, w.graph);
    }

    #[test]
    fn weight_lookup_by_provenance() {
        let w = SourceWeights::new(0.7, 0.3);
        assert_eq!(weight_of(w, Provenance::Vector), 0.7);
        assert_eq!(weight_of(w, Provenance::Graph), 0.3);
    }
}
