use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::chunk::ChunkId;

/// Entity identifier.
pub type EntityId = String;

/// Relationship identifier.
pub type RelationshipId = String;

/// Fixed entity taxonomy of the academic domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Program,
    Subject,
    Degree,
    Requirement,
    Deadline,
    Article,
    Contact,
    Role,
    Institution,
    Resolution,
    Modality,
    Process,
    Document,
}

/// Typed, directed edge labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    RequiresGraduationFrom,
    CombinesWith,
    BelongsTo,
    GrantsDegree,
    IsCorrelativeOf,
    IsRequirementFor,
    TaughtIn,
    Regulates,
    HasDeadline,
    AppliesTo,
    ContactFor,
    DocumentedIn,
}

impl RelationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequiresGraduationFrom => "requires_graduation_from",
            Self::CombinesWith => "combines_with",
            Self::BelongsTo => "belongs_to",
            Self::GrantsDegree => "grants_degree",
            Self::IsCorrelativeOf => "is_correlative_of",
            Self::IsRequirementFor => "is_requirement_for",
            Self::TaughtIn => "taught_in",
            Self::Regulates => "regulates",
            Self::HasDeadline => "has_deadline",
            Self::AppliesTo => "applies_to",
            Self::ContactFor => "contact_for",
            Self::DocumentedIn => "documented_in",
        }
    }
}

/// A knowledge-graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Canonical name.
    pub name: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub source_chunks: BTreeSet<ChunkId>,
    /// Community assigned by the graph construction pass.
    #[serde(default)]
    pub community: Option<u32>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type,
            aliases: Vec::new(),
            source_chunks: BTreeSet::new(),
            community: None,
        }
    }

    /// Canonical name followed by aliases.
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// A directed typed edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source: EntityId,
    pub target: EntityId,
    pub relation_type: RelationType,
    #[serde(default)]
    pub source_chunks: BTreeSet<ChunkId>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl Relationship {
    /// Edge weight in [0, 1]; unweighted edges count as 1.0.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// The endpoint opposite to `from`, if `from` is an endpoint.
    pub fn other_end(&self, from: &str) -> Option<&EntityId> {
        if self.source == from {
            Some(&self.target)
        } else if self.target == from {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// An entity reached during neighborhood expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachedEntity {
    pub entity_id: EntityId,
    /// The seed this entity was reached from.
    pub seed: EntityId,
    pub hops: usize,
    pub score: f64,
    /// Entity ids from the seed to this entity, inclusive.
    pub path: Vec<EntityId>,
}

/// Entities and relationships reachable from a set of seeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    pub entities: Vec<ReachedEntity>,
    pub relationships: Vec<Relationship>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// A weighted path between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPath {
    pub entity_ids: Vec<EntityId>,
    pub relationships: Vec<Relationship>,
    pub cost: f64,
}

impl GraphPath {
    /// Chunks supporting any edge on the path.
    pub fn supporting_chunks(&self) -> BTreeSet<ChunkId> {
        self.relationships
            .iter()
            .flat_map(|r| r.source_chunks.iter().cloned())
            .collect()
    }

    pub fn hops(&self) -> usize {
        self.relationships.len()
    }
}
