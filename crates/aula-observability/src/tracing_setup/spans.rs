//! Span definitions per pipeline stage: answer, retrieval, verification, embedding.

/// Create the top-level span of one `answer` call.
#[macro_export]
macro_rules! answer_span {
    ($session_id:expr) => {
        $crate::tracing::info_span!("aula.answer", session_id = %$session_id)
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr, $query_type:expr) => {
        $crate::tracing::info_span!("aula.retrieval", query = %$query, query_type = %$query_type)
    };
}

/// Create a verification span.
#[macro_export]
macro_rules! verification_span {
    ($evidence_count:expr) => {
        $crate::tracing::info_span!("aula.verification", evidence_count = $evidence_count)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr, $dimension:expr) => {
        $crate::tracing::info_span!("aula.embedding", provider = %$provider, dimension = $dimension)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const ANSWER: &str = "aula.answer";
    pub const RETRIEVAL: &str = "aula.retrieval";
    pub const VERIFICATION: &str = "aula.verification";
    pub const EMBEDDING: &str = "aula.embedding";
}
