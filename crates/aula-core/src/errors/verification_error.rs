/// Verification pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("entailment scorer failed: {reason}")]
    EntailmentFailed { reason: String },

    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    #[error("draft has no verifiable claims")]
    NoClaims,
}
