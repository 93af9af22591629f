//! # aula-core
//!
//! Foundation crate for the Aula hybrid retrieval & verification engine.
//! Defines the data model, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod query_type;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AulaConfig;
pub use errors::{AulaError, AulaResult};
pub use models::{Chunk, ChunkId, Entity, EntityId, FusedEvidence, Provenance, Relationship};
pub use query_type::QueryType;
