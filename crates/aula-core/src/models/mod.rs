mod chunk;
mod conversation;
mod degradation_event;
mod evidence;
mod graph;
mod response;
mod retrieval;
mod verdict;

pub use chunk::{Chunk, ChunkId, ChunkMetadata, DocumentType};
pub use conversation::{ChatHistory, Turn};
pub use degradation_event::DegradationEvent;
pub use evidence::{EvidenceItem, FusedEvidence};
pub use graph::{
    Entity, EntityId, EntityType, GraphPath, ReachedEntity, RelationType, Relationship,
    RelationshipId, Subgraph,
};
pub use response::{AnswerResponse, ResponseStatus};
pub use retrieval::{GraphTrace, MetadataFilter, Provenance, RetrievalResult};
pub use verdict::{
    AbstentionReason, CheckResult, Citation, ClaimScore, Conflict, VerdictStatus,
    VerificationLayer, VerificationVerdict,
};
