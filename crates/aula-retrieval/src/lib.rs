//! # aula-retrieval
//!
//! Hybrid retrieval over a closed academic corpus: dense vector search with
//! MMR re-ranking, knowledge-graph neighborhood and path search, query
//! enhancement (HyDE, synonyms, paraphrases), and query-adaptive weighted RRF.

pub mod engine;
pub mod expansion;
pub mod fusion;
pub mod graph;
pub mod vector;

pub use engine::{CorpusSnapshot, HybridRetrieval, HybridRetriever};
