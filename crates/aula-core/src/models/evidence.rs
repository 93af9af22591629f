use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::chunk::Chunk;
use super::retrieval::Provenance;

/// One fused evidence entry. No two entries of a [`FusedEvidence`] share a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub chunk: Chunk,
    pub fused_score: f64,
    pub provenance: BTreeSet<Provenance>,
    /// Retriever-native score per contributing source.
    pub source_scores: BTreeMap<Provenance, f64>,
    /// Best 1-based rank per contributing source.
    pub source_ranks: BTreeMap<Provenance, usize>,
    /// Rendered graph context when a graph result contributed.
    pub graph_context: Option<String>,
}

impl EvidenceItem {
    pub fn has(&self, provenance: Provenance) -> bool {
        self.provenance.contains(&provenance)
    }
}

/// Ranked, chunk-deduplicated evidence produced by hybrid fusion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusedEvidence {
    pub items: Vec<EvidenceItem>,
}

impl FusedEvidence {
    pub fn new(items: Vec<EvidenceItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvidenceItem> {
        self.items.iter()
    }

    /// Entry at a 1-based citation marker.
    pub fn by_marker(&self, marker: usize) -> Option<&EvidenceItem> {
        marker.checked_sub(1).and_then(|i| self.items.get(i))
    }

    pub fn position_of(&self, chunk_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.chunk.id == chunk_id)
    }

    pub fn chunk_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.chunk.id.as_str()).collect()
    }

    /// Highest retriever-native vector score, used as a retrieval-quality signal.
    pub fn best_vector_score(&self) -> Option<f64> {
        self.items
            .iter()
            .filter_map(|i| i.source_scores.get(&Provenance::Vector).copied())
            .fold(None, |best, s| Some(best.map_or(s, |b: f64| b.max(s))))
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }
}
