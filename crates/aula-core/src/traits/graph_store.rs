use crate::errors::AulaResult;
use crate::models::{Entity, EntityId, GraphPath, Relationship, Subgraph};

/// Read-only knowledge-graph queries.
pub trait IGraphStore: Send + Sync {
    fn entity(&self, id: &str) -> Option<&Entity>;

    /// Relationships touching `id` in either direction.
    fn relationships_of(&self, id: &str) -> Vec<&Relationship>;

    /// Entities within `hops` of any seed. Each reached entity's score is the
    /// product of edge weights along its best path; seeds score 1.0.
    fn neighbors(&self, ids: &[EntityId], hops: usize) -> AulaResult<Subgraph>;

    /// Lowest-cost path between two entities, ignoring edge direction.
    fn shortest_path(&self, from: &str, to: &str) -> AulaResult<Option<GraphPath>>;

    fn community_of(&self, id: &str) -> Option<u32>;

    /// Entity ids whose name or alias occurs in `text`.
    fn resolve_entities(&self, text: &str) -> Vec<EntityId>;

    fn entity_count(&self) -> usize;
}
