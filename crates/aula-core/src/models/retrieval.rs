use std::fmt;

use serde::{Deserialize, Serialize};

use super::chunk::{Chunk, ChunkId, DocumentType};
use super::graph::EntityId;

/// Which retriever produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Vector,
    Graph,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector => f.write_str("vector"),
            Self::Graph => f.write_str("graph"),
        }
    }
}

/// How a graph result was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphTrace {
    pub entity_id: EntityId,
    pub hops: usize,
    pub path: Vec<EntityId>,
    /// Rendered entity/relationship lines for the synthesizer.
    pub description: String,
}

/// A ranked item from one retriever. `score` is in that retriever's own scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunk_id: ChunkId,
    pub score: f64,
    pub provenance: Provenance,
    /// 1-based rank within the retriever's list.
    pub rank: usize,
    #[serde(default)]
    pub graph: Option<GraphTrace>,
}

impl RetrievalResult {
    pub fn vector(chunk_id: impl Into<String>, score: f64, rank: usize) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            score,
            provenance: Provenance::Vector,
            rank,
            graph: None,
        }
    }

    pub fn graph(chunk_id: impl Into<String>, score: f64, rank: usize, trace: GraphTrace) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            score,
            provenance: Provenance::Graph,
            rank,
            graph: Some(trace),
        }
    }
}

/// Post-filter on chunk metadata. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataFilter {
    pub programs: Vec<String>,
    pub document_ids: Vec<String>,
    pub doc_types: Vec<DocumentType>,
}

impl MetadataFilter {
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty() && self.document_ids.is_empty() && self.doc_types.is_empty()
    }

    pub fn matches(&self, chunk: &Chunk) -> bool {
        let program_ok = self.programs.is_empty()
            || chunk
                .metadata
                .programs
                .iter()
                .any(|p| self.programs.iter().any(|f| f.eq_ignore_ascii_case(p)));
        let document_ok =
            self.document_ids.is_empty() || self.document_ids.contains(&chunk.document_id);
        let type_ok =
            self.doc_types.is_empty() || self.doc_types.contains(&chunk.metadata.doc_type);
        program_ok && document_ok && type_ok
    }
}
