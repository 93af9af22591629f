//! Bounded breadth-first neighborhood expansion in both edge directions.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use aula_core::constants::MAX_GRAPH_HOPS;
use aula_core::errors::{AulaResult, GraphError};
use aula_core::models::{EntityId, ReachedEntity, Subgraph};
use petgraph::stable_graph::NodeIndex;

use super::knowledge_graph::KnowledgeGraph;

#[derive(Debug, Clone)]
struct Reach {
    hops: usize,
    strength: f64,
    path: Vec<NodeIndex>,
}

/// Entities within `hops` of any known seed, each with its strongest path.
///
/// Strength is the product of edge weights along the path; seeds have 1.0.
/// Fewer hops always wins over a stronger but longer path. Unknown seeds are
/// skipped.
pub(crate) fn neighborhood(
    graph: &KnowledgeGraph,
    seeds: &[EntityId],
    hops: usize,
) -> AulaResult<Subgraph> {
    if hops > MAX_GRAPH_HOPS {
        return Err(GraphError::HopLimitExceeded {
            requested: hops,
            max: MAX_GRAPH_HOPS,
        }
        .into());
    }

    // entity → (seed, reach); best across all seeds.
    let mut best: BTreeMap<EntityId, (EntityId, Reach)> = BTreeMap::new();
    let mut edges: BTreeSet<String> = BTreeSet::new();

    let known: BTreeSet<&EntityId> = seeds.iter().filter(|s| graph.node(s).is_some()).collect();
    for seed in known {
        let Some(start) = graph.node(seed) else { continue };
        for (idx, reach) in expand_from(graph, start, hops, &mut edges) {
            let Some(entity_id) = graph.entity_id_at(idx) else { continue };
            let better = best.get(entity_id).map_or(true, |(_, prev)| {
                reach.hops < prev.hops
                    || (reach.hops == prev.hops && reach.strength > prev.strength)
            });
            if better {
                best.insert(entity_id.clone(), (seed.clone(), reach));
            }
        }
    }

    let entities = best
        .into_iter()
        .map(|(entity_id, (seed, reach))| ReachedEntity {
            entity_id,
            seed,
            hops: reach.hops,
            score: reach.strength,
            path: reach
                .path
                .iter()
                .filter_map(|i| graph.entity_id_at(*i).cloned())
                .collect(),
        })
        .collect();

    let relationships = edges
        .iter()
        .filter_map(|id| graph.relationship(id).cloned())
        .collect();

    Ok(Subgraph {
        entities,
        relationships,
    })
}

fn expand_from(
    graph: &KnowledgeGraph,
    start: NodeIndex,
    hops: usize,
    edges: &mut BTreeSet<String>,
) -> HashMap<NodeIndex, Reach> {
    let mut reached: HashMap<NodeIndex, Reach> = HashMap::new();
    reached.insert(
        start,
        Reach {
            hops: 0,
            strength: 1.0,
            path: vec![start],
        },
    );
    let mut frontier = vec![start];

    for depth in 1..=hops {
        let mut next: HashMap<NodeIndex, Reach> = HashMap::new();
        for &node in &frontier {
            let Some(current) = reached.get(&node).cloned() else { continue };
            for (neighbor, edge) in graph.incident(node) {
                edges.insert(edge.relationship_id.clone());
                if reached.get(&neighbor).is_some_and(|r| r.hops < depth) {
                    continue;
                }
                let strength = current.strength * edge.weight;
                if next.get(&neighbor).map_or(true, |r| strength > r.strength) {
                    let mut path = current.path.clone();
                    path.push(neighbor);
                    next.insert(
                        neighbor,
                        Reach {
                            hops: depth,
                            strength,
                            path,
                        },
                    );
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next.keys().copied().collect();
        frontier.sort();
        reached.extend(next);
    }
    reached
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use aula_core::models::{Entity, EntityType, RelationType, Relationship};
    use aula_core::traits::IGraphStore;

    use super::*;

    fn rel(id: &str, s: &str, t: &str, w: f64) -> Relationship {
        Relationship {
            id: id.into(),
            source: s.into(),
            target: t.into(),
            relation_type: RelationType::IsRequirementFor,
            source_chunks: BTreeSet::new(),
            weight: Some(w),
        }
    }

    /// a → b → c → d, plus a → c with a weak edge.
    fn chain() -> KnowledgeGraph {
        let mut g = KnowledgeGraph::new();
        for id in ["a", "b", "c", "d"] {
            g.add_entity(Entity::new(id, id, EntityType::Requirement)).unwrap();
        }
        g.add_relationship(rel("ab", "a", "b", 0.9)).unwrap();
        g.add_relationship(rel("bc", "b", "c", 0.8)).unwrap();
        g.add_relationship(rel("cd", "c", "d", 1.0)).unwrap();
        g.add_relationship(rel("ac", "a", "c", 0.2)).unwrap();
        g
    }

    #[test]
    fn hop_limit_bounds_expansion() {
        let g = chain();
        let sub = g.neighbors(&["a".to_string()], 1).unwrap();
        let ids: Vec<&str> = sub.entities.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn shorter_path_wins_over_stronger_longer_one() {
        let g = chain();
        let sub = g.neighbors(&["a".to_string()], 2).unwrap();
        let c = sub.entities.iter().find(|e| e.entity_id == "c").unwrap();
        assert_eq!(c.hops, 1);
        assert!((c.score - 0.2).abs() < 1e-9);
        let d = sub.entities.iter().find(|e| e.entity_id == "d").unwrap();
        assert_eq!(d.hops, 2);
        assert_eq!(d.path, vec!["a", "c", "d"]);
    }

    #[test]
    fn edges_are_followed_against_their_direction() {
        let g = chain();
        let sub = g.neighbors(&["d".to_string()], 1).unwrap();
        assert!(sub.entities.iter().any(|e| e.entity_id == "c"));
    }

    #[test]
    fn unknown_seeds_yield_empty_subgraph() {
        let g = chain();
        let sub = g.neighbors(&["zzz".to_string()], 2).unwrap();
        assert!(sub.is_empty());
    }

    #[test]
    fn excessive_hops_are_rejected() {
        let g = chain();
        assert!(g.neighbors(&["a".to_string()], MAX_GRAPH_HOPS + 1).is_err());
    }
}
