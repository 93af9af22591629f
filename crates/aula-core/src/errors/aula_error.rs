use super::{
    ConfigError, EmbeddingError, GenerationError, GraphError, RetrievalError, SessionError,
    VerificationError,
};

/// Top-level error type aggregating all subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum AulaError {
    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("generation error: {0}")]
    GenerationError(#[from] GenerationError),

    #[error("verification error: {0}")]
    VerificationError(#[from] VerificationError),

    #[error("session error: {0}")]
    SessionError(#[from] SessionError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("degraded mode: {component} using {fallback}")]
    DegradedMode { component: String, fallback: String },
}

/// Convenience result type for the workspace.
pub type AulaResult<T> = Result<T, AulaError>;
