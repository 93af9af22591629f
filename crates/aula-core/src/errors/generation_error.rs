/// External text generation / entailment service errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generator unavailable: {service}")]
    Unavailable { service: String },

    #[error("generation failed: {reason}")]
    Failed { reason: String },

    #[error("empty completion from {service}")]
    EmptyCompletion { service: String },
}
