use async_trait::async_trait;

use crate::errors::AulaResult;
use crate::models::{ChatHistory, FusedEvidence};

/// External text generator (HyDE, paraphrases, summaries).
#[async_trait]
pub trait ITextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> AulaResult<String>;

    fn name(&self) -> &str;
}

/// External natural-language-inference scorer.
#[async_trait]
pub trait INliScorer: Send + Sync {
    /// Probability in [0, 1] that `premise` entails `hypothesis`.
    async fn entails(&self, premise: &str, hypothesis: &str) -> AulaResult<f64>;
}

/// External answer synthesizer. Drafts cite evidence with `[n]` markers,
/// where `n` is the 1-based position in the fused evidence.
#[async_trait]
pub trait IAnswerSynthesizer: Send + Sync {
    async fn draft(
        &self,
        query: &str,
        evidence: &FusedEvidence,
        history: &ChatHistory,
    ) -> AulaResult<String>;
}
