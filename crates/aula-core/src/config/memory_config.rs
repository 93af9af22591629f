use serde::{Deserialize, Serialize};

use super::defaults;

/// Conversation memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Number of raw turns kept before folding the oldest into the summary.
    pub window_size: usize,
    /// Running summary cap, in characters. The most recent content is kept.
    pub max_summary_chars: usize,
    pub summary_max_tokens: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window_size: defaults::DEFAULT_WINDOW_SIZE,
            max_summary_chars: defaults::DEFAULT_MAX_SUMMARY_CHARS,
            summary_max_tokens: defaults::DEFAULT_SUMMARY_MAX_TOKENS,
        }
    }
}
