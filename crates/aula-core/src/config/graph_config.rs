use serde::{Deserialize, Serialize};

use super::defaults;

/// Knowledge-graph retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum hops expanded from each seed entity.
    pub max_hops: usize,
    /// Per-hop score multiplier (score = decay^hops × edge weights).
    pub hop_decay: f64,
    /// Multiplier for entities in the seed's community.
    pub same_community_bonus: f64,
    /// Multiplier for entities outside the seed's community.
    pub cross_community_penalty: f64,
    /// Upper bound on entities reached per request.
    pub max_nodes: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_hops: defaults::DEFAULT_MAX_HOPS,
            hop_decay: defaults::DEFAULT_HOP_DECAY,
            same_community_bonus: defaults::DEFAULT_SAME_COMMUNITY_BONUS,
            cross_community_penalty: defaults::DEFAULT_CROSS_COMMUNITY_PENALTY,
            max_nodes: defaults::DEFAULT_MAX_GRAPH_NODES,
        }
    }
}
