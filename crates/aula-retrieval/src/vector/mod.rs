mod index;
pub mod mmr;
mod retriever;

pub use index::InMemoryVectorIndex;
pub use retriever::{VectorOptions, VectorRetriever};
