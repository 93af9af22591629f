/// Aula system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard ceiling on graph traversal depth, regardless of configuration.
pub const MAX_GRAPH_HOPS: usize = 5;

/// Hard ceiling on the number of query variants retrieved per request.
pub const MAX_QUERY_VARIANTS: usize = 8;

/// Maximum characters of a hypothetical document kept for embedding.
pub const MAX_HYPOTHETICAL_CHARS: usize = 1_000;

/// Maximum characters of a turn folded into a summarization prompt.
pub const MAX_FOLDED_TURN_CHARS: usize = 200;

/// Maximum length accepted for a session identifier.
pub const MAX_SESSION_ID_LEN: usize = 128;
