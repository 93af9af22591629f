//! # aula-embeddings
//!
//! Query and evidence embedding for the retrieval and verification pipeline.
//! Provider fallback chain with degradation events, a hashed TF-IDF provider
//! that is always available, a moka L1 cache keyed by blake3 hashes, and the
//! vector math shared by retrieval and verification.

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod math;
pub mod providers;

pub use engine::EmbeddingEngine;
