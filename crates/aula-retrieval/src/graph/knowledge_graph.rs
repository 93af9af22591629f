//! Arena storage for the knowledge graph.
//!
//! Entity and relationship tables keyed by id, plus an undirected petgraph
//! topology for traversal. Relationship direction lives in the table.
//! Cycles and parallel edges are allowed.

use std::collections::{BTreeMap, HashMap};

use aula_core::errors::{AulaResult, GraphError};
use aula_core::models::{Entity, EntityId, GraphPath, Relationship, RelationshipId, Subgraph};
use aula_core::traits::IGraphStore;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::{path, resolve, traversal};

/// Edge payload in the topology graph.
#[derive(Debug, Clone)]
pub(crate) struct EdgeData {
    pub relationship_id: RelationshipId,
    pub weight: f64,
}

/// Serializable form of a [`KnowledgeGraph`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    pub(crate) graph: StableUnGraph<EntityId, EdgeData>,
    pub(crate) node_index: HashMap<EntityId, NodeIndex>,
    pub(crate) entities: BTreeMap<EntityId, Entity>,
    pub(crate) relationships: BTreeMap<RelationshipId, Relationship>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) -> AulaResult<()> {
        if self.entities.contains_key(&entity.id) {
            return Err(GraphError::DuplicateEntity {
                entity_id: entity.id,
            }
            .into());
        }
        let idx = self.graph.add_node(entity.id.clone());
        self.node_index.insert(entity.id.clone(), idx);
        self.entities.insert(entity.id.clone(), entity);
        Ok(())
    }

    /// Add a directed relationship. Both endpoints must already exist.
    pub fn add_relationship(&mut self, relationship: Relationship) -> AulaResult<()> {
        let endpoint = |id: &str| {
            self.node_index
                .get(id)
                .copied()
                .ok_or_else(|| GraphError::DanglingRelationship {
                    relationship_id: relationship.id.clone(),
                    entity_id: id.to_string(),
                })
        };
        let source = endpoint(&relationship.source)?;
        let target = endpoint(&relationship.target)?;

        self.graph.add_edge(
            source,
            target,
            EdgeData {
                relationship_id: relationship.id.clone(),
                weight: relationship.effective_weight(),
            },
        );
        self.relationships
            .insert(relationship.id.clone(), relationship);
        Ok(())
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> AulaResult<Self> {
        let mut graph = Self::new();
        for entity in snapshot.entities {
            graph.add_entity(entity)?;
        }
        for relationship in snapshot.relationships {
            graph.add_relationship(relationship)?;
        }
        Ok(graph)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            entities: self.entities.values().cloned().collect(),
            relationships: self.relationships.values().cloned().collect(),
        }
    }

    pub fn from_json(json: &str) -> AulaResult<Self> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn to_json(&self) -> AulaResult<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub(crate) fn node(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub(crate) fn entity_id_at(&self, idx: NodeIndex) -> Option<&EntityId> {
        self.graph.node_weight(idx)
    }

    /// Neighbors of `idx` in either direction as `(neighbor, edge data)`.
    pub(crate) fn incident(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &EdgeData)> {
        self.graph.edges(idx).map(move |e| {
            let other = if e.source() == idx { e.target() } else { e.source() };
            (other, e.weight())
        })
    }
}

impl IGraphStore for KnowledgeGraph {
    fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    fn relationships_of(&self, id: &str) -> Vec<&Relationship> {
        let Some(idx) = self.node(id) else {
            return Vec::new();
        };
        let mut rels: Vec<&Relationship> = self
            .incident(idx)
            .filter_map(|(_, edge)| self.relationships.get(&edge.relationship_id))
            .collect();
        rels.sort_by(|a, b| a.id.cmp(&b.id));
        rels.dedup_by(|a, b| a.id == b.id);
        rels
    }

    fn neighbors(&self, ids: &[EntityId], hops: usize) -> AulaResult<Subgraph> {
        traversal::neighborhood(self, ids, hops)
    }

    fn shortest_path(&self, from: &str, to: &str) -> AulaResult<Option<GraphPath>> {
        path::shortest(self, from, to)
    }

    fn community_of(&self, id: &str) -> Option<u32> {
        self.entities.get(id).and_then(|e| e.community)
    }

    fn resolve_entities(&self, text: &str) -> Vec<EntityId> {
        resolve::resolve(self.entities.values(), text)
    }

    fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
