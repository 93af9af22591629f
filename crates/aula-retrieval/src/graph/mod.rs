mod knowledge_graph;
mod path;
pub mod render;
mod resolve;
mod retriever;
mod traversal;

pub use knowledge_graph::{GraphSnapshot, KnowledgeGraph};
pub use retriever::{GraphRetrieval, GraphRetriever, PathResult};
