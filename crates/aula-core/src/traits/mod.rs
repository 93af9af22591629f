mod contacts;
mod embedding;
mod generation;
mod graph_store;
mod index;

pub use contacts::IContactDirectory;
pub use embedding::IEmbeddingProvider;
pub use generation::{IAnswerSynthesizer, INliScorer, ITextGenerator};
pub use graph_store::IGraphStore;
pub use index::{IVectorIndex, IndexHit};
