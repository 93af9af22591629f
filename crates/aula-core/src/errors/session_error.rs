/// Conversation session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("malformed session id: {reason}")]
    MalformedSession { reason: String },

    #[error("session not found: {session_id}")]
    NotFound { session_id: String },

    #[error("summarization failed: {reason}")]
    SummarizationFailed { reason: String },
}
