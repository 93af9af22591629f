// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_USE_MMR: bool = true;
pub const DEFAULT_MMR_LAMBDA: f64 = 0.5;
pub const DEFAULT_OVERFETCH_FACTOR: usize = 4;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.3;

// --- Graph ---
pub const DEFAULT_MAX_HOPS: usize = 2;
pub const DEFAULT_HOP_DECAY: f64 = 0.7;
pub const DEFAULT_SAME_COMMUNITY_BONUS: f64 = 1.0;
pub const DEFAULT_CROSS_COMMUNITY_PENALTY: f64 = 0.8;
pub const DEFAULT_MAX_GRAPH_NODES: usize = 50;

// --- Query enhancement ---
pub const DEFAULT_HYDE_ENABLED: bool = true;
pub const DEFAULT_HYDE_ALPHA: f64 = 0.6;
pub const DEFAULT_HYDE_MAX_TOKENS: usize = 256;
pub const DEFAULT_SYNONYMS_ENABLED: bool = true;
pub const DEFAULT_PARAPHRASE_COUNT: usize = 3;
pub const DEFAULT_PARAPHRASE_MAX_TOKENS: usize = 200;

// --- Fusion ---
pub const DEFAULT_RRF_K: u32 = 60;

// --- Conversation memory ---
pub const DEFAULT_WINDOW_SIZE: usize = 6;
pub const DEFAULT_MAX_SUMMARY_CHARS: usize = 500;
pub const DEFAULT_SUMMARY_MAX_TOKENS: usize = 200;

// --- Verification ---
pub const DEFAULT_FAITHFULNESS_THRESHOLD: f64 = 0.75;
pub const DEFAULT_ENTAILMENT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_ABSTENTION_THRESHOLD: f64 = 0.65;
pub const DEFAULT_CROSS_REFERENCE_NEUTRAL: f64 = 0.5;
pub const DEFAULT_MAX_CONTACTS: usize = 3;
pub const DEFAULT_MIN_CLAIM_CHARS: usize = 10;
pub const DEFAULT_FALLBACK_CONTACT: &str = "gestion.academica.lse@fi.uba.ar";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 10_000;
