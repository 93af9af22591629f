//! The academic corpus fixture: chunks without embeddings plus the knowledge
//! graph built over them.

use aula_core::models::{Chunk, ChunkMetadata, Entity, Relationship};
use serde::{Deserialize, Serialize};

use crate::doubles::HashingEmbedder;
use crate::load_fixture;

pub const CORPUS_PATH: &str = "corpus/lse_corpus.json";

/// A chunk as stored in the fixture; its embedding is computed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkFixture {
    pub id: String,
    pub text: String,
    pub document_id: String,
    pub section: String,
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

/// Same shape as the graph store's JSON snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFixture {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFixture {
    #[serde(default)]
    pub description: String,
    pub chunks: Vec<ChunkFixture>,
    #[serde(default)]
    pub graph: GraphFixture,
}

impl CorpusFixture {
    /// Chunks embedded with `embedder`.
    pub fn embedded_chunks(&self, embedder: &HashingEmbedder) -> Vec<Chunk> {
        self.chunks
            .iter()
            .map(|c| {
                Chunk::new(
                    c.id.clone(),
                    c.text.clone(),
                    c.document_id.clone(),
                    c.section.clone(),
                    embedder.vectorize(&c.text),
                )
                .with_metadata(c.metadata.clone())
            })
            .collect()
    }

    /// The graph section serialized as a graph snapshot JSON document.
    pub fn graph_json(&self) -> String {
        serde_json::to_string(&self.graph)
            .unwrap_or_else(|e| panic!("Failed to serialize graph fixture: {e}"))
    }

    pub fn chunk(&self, id: &str) -> Option<&ChunkFixture> {
        self.chunks.iter().find(|c| c.id == id)
    }
}

/// Load `corpus/lse_corpus.json`.
pub fn load_corpus() -> CorpusFixture {
    load_fixture(CORPUS_PATH)
}
