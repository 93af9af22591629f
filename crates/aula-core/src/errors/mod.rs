mod aula_error;
mod config_error;
mod embedding_error;
mod generation_error;
mod graph_error;
mod retrieval_error;
mod session_error;
mod verification_error;

pub use aula_error::{AulaError, AulaResult};
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use generation_error::GenerationError;
pub use graph_error::GraphError;
pub use retrieval_error::RetrievalError;
pub use session_error::SessionError;
pub use verification_error::VerificationError;
