//! Graph retrieval: community-biased neighborhood scoring and seed-to-seed paths,
//! emitted as chunk-level results.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use aula_core::config::GraphConfig;
use aula_core::constants::MAX_GRAPH_HOPS;
use aula_core::errors::AulaResult;
use aula_core::models::{ChunkId, EntityId, GraphPath, GraphTrace, RetrievalResult, Subgraph};
use aula_core::traits::IGraphStore;
use tracing::debug;

use super::render;

/// Output of one graph retrieval.
#[derive(Debug, Clone, Default)]
pub struct GraphRetrieval {
    /// Chunk-level results, 1-based ranks.
    pub results: Vec<RetrievalResult>,
    pub subgraph: Subgraph,
    pub paths: Vec<GraphPath>,
}

impl GraphRetrieval {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A path between two entities with its rendered description.
#[derive(Debug, Clone)]
pub struct PathResult {
    pub path: GraphPath,
    pub description: String,
    pub supporting_chunks: BTreeSet<ChunkId>,
}

#[derive(Debug, Clone)]
struct Contribution {
    score: f64,
    trace: GraphTrace,
}

pub struct GraphRetriever {
    store: Arc<dyn IGraphStore>,
    config: GraphConfig,
}

impl GraphRetriever {
    pub fn new(store: Arc<dyn IGraphStore>, config: GraphConfig) -> Self {
        Self { store, config }
    }

    /// Chunks supporting entities and relationships within `hops` of the seeds.
    ///
    /// Entity score is `hop_decay^hops × Π edge weights × community factor`,
    /// where the factor is the same-community bonus when the entity shares a
    /// community with a seed and the cross-community penalty otherwise.
    /// Same-community entities are kept first when `max_nodes` truncates.
    pub fn retrieve(&self, entity_ids: &[EntityId], hops: usize) -> AulaResult<GraphRetrieval> {
        let seeds: Vec<EntityId> = entity_ids
            .iter()
            .filter(|id| self.store.entity(id).is_some())
            .cloned()
            .collect();
        if seeds.is_empty() {
            debug!(requested = entity_ids.len(), "no query entity matched the graph");
            return Ok(GraphRetrieval::default());
        }

        let hops = hops.min(MAX_GRAPH_HOPS);
        let subgraph = self.store.neighbors(&seeds, hops)?;

        let seed_communities: BTreeSet<u32> = seeds
            .iter()
            .filter_map(|s| self.store.community_of(s))
            .collect();

        let mut scored: Vec<(bool, f64, &aula_core::models::ReachedEntity)> = subgraph
            .entities
            .iter()
            .map(|reached| {
                let same = match self.store.community_of(&reached.entity_id) {
                    Some(c) => seed_communities.is_empty() || seed_communities.contains(&c),
                    None => true,
                };
                let factor = if same {
                    self.config.same_community_bonus
                } else {
                    self.config.cross_community_penalty
                };
                let score =
                    self.config.hop_decay.powi(reached.hops as i32) * reached.score * factor;
                (same, score, reached)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then(b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
                .then(a.2.hops.cmp(&b.2.hops))
                .then_with(|| a.2.entity_id.cmp(&b.2.entity_id))
        });
        scored.truncate(self.config.max_nodes.max(1));

        let entity_scores: BTreeMap<&str, f64> = scored
            .iter()
            .map(|(_, s, r)| (r.entity_id.as_str(), *s))
            .collect();

        let mut chunks: BTreeMap<ChunkId, Contribution> = BTreeMap::new();

        for (_, score, reached) in &scored {
            let Some(entity) = self.store.entity(&reached.entity_id) else { continue };
            let trace = GraphTrace {
                entity_id: reached.entity_id.clone(),
                hops: reached.hops,
                path: reached.path.clone(),
                description: render::entity_context(
                    self.store.as_ref(),
                    &reached.entity_id,
                    &subgraph.relationships,
                ),
            };
            for chunk in &entity.source_chunks {
                offer(&mut chunks, chunk, *score, &trace);
            }
        }

        for rel in &subgraph.relationships {
            let (Some(s), Some(t)) = (
                entity_scores.get(rel.source.as_str()),
                entity_scores.get(rel.target.as_str()),
            ) else {
                continue;
            };
            let score = s.min(*t) * rel.effective_weight();
            let anchor = if s <= t { &rel.source } else { &rel.target };
            let hops = subgraph
                .entities
                .iter()
                .find(|e| &e.entity_id == anchor)
                .map_or(0, |e| e.hops);
            let trace = GraphTrace {
                entity_id: anchor.clone(),
                hops,
                path: vec![rel.source.clone(), rel.target.clone()],
                description: render::relationship_line(self.store.as_ref(), rel),
            };
            for chunk in &rel.source_chunks {
                offer(&mut chunks, chunk, score, &trace);
            }
        }

        let mut paths = Vec::new();
        if seeds.len() >= 2 {
            for (i, a) in seeds.iter().enumerate() {
                for b in &seeds[i + 1..] {
                    if let Some(found) = self.path(a, b)? {
                        let hops = found.path.hops();
                        let strength: f64 = found
                            .path
                            .relationships
                            .iter()
                            .map(|r| r.effective_weight())
                            .product();
                        let score = self.config.hop_decay.powi(hops.saturating_sub(1) as i32)
                            * strength
                            * self.config.same_community_bonus;
                        let trace = GraphTrace {
                            entity_id: b.clone(),
                            hops,
                            path: found.path.entity_ids.clone(),
                            description: found.description.clone(),
                        };
                        for chunk in &found.supporting_chunks {
                            offer(&mut chunks, chunk, score, &trace);
                        }
                        paths.push(found.path);
                    }
                }
            }
        }

        let mut ranked: Vec<(ChunkId, Contribution)> = chunks.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.score
                .partial_cmp(&a.1.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let results: Vec<RetrievalResult> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (chunk_id, c))| RetrievalResult::graph(chunk_id, c.score, i + 1, c.trace))
            .collect();

        debug!(
            seeds = seeds.len(),
            entities = subgraph.entities.len(),
            relationships = subgraph.relationships.len(),
            paths = paths.len(),
            chunks = results.len(),
            "graph retrieval"
        );

        Ok(GraphRetrieval {
            results,
            subgraph,
            paths,
        })
    }

    /// Shortest weighted path between two entities with its supporting chunks.
    pub fn path(&self, from: &str, to: &str) -> AulaResult<Option<PathResult>> {
        let Some(path) = self.store.shortest_path(from, to)? else {
            return Ok(None);
        };
        Ok(Some(PathResult {
            description: render::path_line(self.store.as_ref(), &path),
            supporting_chunks: path.supporting_chunks(),
            path,
        }))
    }
}

fn offer(
    chunks: &mut BTreeMap<ChunkId, Contribution>,
    chunk: &ChunkId,
    score: f64,
    trace: &GraphTrace,
) {
    let better = chunks.get(chunk).map_or(true, |c| score > c.score);
    if better {
        chunks.insert(
            chunk.clone(),
            Contribution {
                score,
                trace: trace.clone(),
            },
        );
    }
}
