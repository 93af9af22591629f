use serde::{Deserialize, Serialize};

use super::defaults;

/// Query enhancement configuration (HyDE + expansion).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Generate a hypothetical document and blend its embedding.
    pub hyde_enabled: bool,
    /// Mixing coefficient: `α·hyde + (1−α)·query`.
    pub hyde_alpha: f64,
    pub hyde_max_tokens: usize,
    /// Deterministic domain synonym substitution.
    pub synonyms_enabled: bool,
    /// Number of generated paraphrases kept (0 disables).
    pub paraphrase_count: usize,
    pub paraphrase_max_tokens: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            hyde_enabled: defaults::DEFAULT_HYDE_ENABLED,
            hyde_alpha: defaults::DEFAULT_HYDE_ALPHA,
            hyde_max_tokens: defaults::DEFAULT_HYDE_MAX_TOKENS,
            synonyms_enabled: defaults::DEFAULT_SYNONYMS_ENABLED,
            paraphrase_count: defaults::DEFAULT_PARAPHRASE_COUNT,
            paraphrase_max_tokens: defaults::DEFAULT_PARAPHRASE_MAX_TOKENS,
        }
    }
}
