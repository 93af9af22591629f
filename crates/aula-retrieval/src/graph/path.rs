//! Weighted shortest paths, ignoring edge direction.
//!
//! Edge cost is `1 + (1 − weight)`: fewer hops first, stronger edges second.

use aula_core::errors::{AulaResult, GraphError};
use aula_core::models::{GraphPath, Relationship};
use petgraph::algo::astar;
use petgraph::visit::EdgeRef;

use super::knowledge_graph::KnowledgeGraph;

fn edge_cost(weight: f64) -> f64 {
    1.0 + (1.0 - weight.clamp(0.0, 1.0))
}

pub(crate) fn shortest(
    graph: &KnowledgeGraph,
    from: &str,
    to: &str,
) -> AulaResult<Option<GraphPath>> {
    let start = graph.node(from).ok_or_else(|| GraphError::EntityNotFound {
        entity_id: from.to_string(),
    })?;
    let goal = graph.node(to).ok_or_else(|| GraphError::EntityNotFound {
        entity_id: to.to_string(),
    })?;

    let Some((cost, nodes)) = astar(
        &graph.graph,
        start,
        |n| n == goal,
        |e| edge_cost(e.weight().weight),
        |_| 0.0,
    ) else {
        return Ok(None);
    };

    let mut relationships: Vec<Relationship> = Vec::with_capacity(nodes.len().saturating_sub(1));
    for pair in nodes.windows(2) {
        // Cheapest of possibly parallel edges between the pair.
        let best = graph
            .incident(pair[0])
            .filter(|(other, _)| *other == pair[1])
            .min_by(|(_, a), (_, b)| {
                edge_cost(a.weight)
                    .partial_cmp(&edge_cost(b.weight))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .and_then(|(_, edge)| graph.relationship(&edge.relationship_id));
        if let Some(rel) = best {
            relationships.push(rel.clone());
        }
    }

    Ok(Some(GraphPath {
        entity_ids: nodes
            .iter()
            .filter_map(|i| graph.entity_id_at(*i).cloned())
            .collect(),
        relationships,
        cost,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use aula_core::models::{Entity, EntityType, RelationType};
    use aula_core::traits::IGraphStore;

    use super::*;

    fn rel(id: &str, s: &str, t: &str, w: f64, chunk: &str) -> Relationship {
        Relationship {
            id: id.into(),
            source: s.into(),
            target: t.into(),
            relation_type: RelationType::IsCorrelativeOf,
            source_chunks: BTreeSet::from([chunk.to_string()]),
            weight: Some(w),
        }
    }

    fn graph() -> KnowledgeGraph {
        let mut g = KnowledgeGraph::new();
        for id in ["a", "b", "c", "d", "island"] {
            g.add_entity(Entity::new(id, id, EntityType::Subject)).unwrap();
        }
        g.add_relationship(rel("ab", "a", "b", 1.0, "c-ab")).unwrap();
        g.add_relationship(rel("bd", "b", "d", 1.0, "c-bd")).unwrap();
        g.add_relationship(rel("ac", "a", "c", 0.1, "c-ac")).unwrap();
        g.add_relationship(rel("cd", "c", "d", 0.1, "c-cd")).unwrap();
        g
    }

    #[test]
    fn prefers_stronger_path_of_equal_length() {
        let g = graph();
        let path = g.shortest_path("a", "d").unwrap().unwrap();
        assert_eq!(path.entity_ids, vec!["a", "b", "d"]);
        assert_eq!(path.hops(), 2);
        assert_eq!(
            path.supporting_chunks(),
            BTreeSet::from(["c-ab".to_string(), "c-bd".to_string()])
        );
        assert!((path.cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn path_ignores_edge_direction() {
        let g = graph();
        let path = g.shortest_path("d", "a").unwrap().unwrap();
        assert_eq!(path.entity_ids, vec!["d", "b", "a"]);
    }

    #[test]
    fn disconnected_entities_have_no_path() {
        let g = graph();
        assert!(g.shortest_path("a", "island").unwrap().is_none());
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let g = graph();
        assert!(g.shortest_path("a", "ghost").is_err());
    }
}
