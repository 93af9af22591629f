use serde::{Deserialize, Serialize};

/// Chunk identifier.
pub type ChunkId = String;

/// Coarse document category, used for post-filtering and contact harvesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Regulation,
    Program,
    Faq,
    #[default]
    Other,
}

/// Metadata attached to a chunk at ingestion time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkMetadata {
    /// Program codes the chunk talks about (e.g. "CEIA", "MIA").
    pub programs: Vec<String>,
    pub doc_type: DocumentType,
}

/// An immutable passage of a source document with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub document_id: String,
    pub section: String,
    pub embedding: Vec<f32>,
    /// blake3 hex digest of `text`.
    pub content_hash: String,
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        document_id: impl Into<String>,
        section: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        let text = text.into();
        let content_hash = Self::compute_content_hash(&text);
        Self {
            id: id.into(),
            text,
            document_id: document_id.into(),
            section: section.into(),
            embedding,
            content_hash,
            metadata: ChunkMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn compute_content_hash(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Whether the stored hash still matches the text.
    pub fn hash_matches(&self) -> bool {
        self.content_hash == Self::compute_content_hash(&self.text)
    }

    pub fn is_faq(&self) -> bool {
        self.metadata.doc_type == DocumentType::Faq
    }
}
