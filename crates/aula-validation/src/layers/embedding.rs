//! Embedding faithfulness: every claim must be close to some evidence sentence.

use aula_core::errors::{AulaResult, VerificationError};
use aula_core::models::{CheckResult, DegradationEvent, FusedEvidence, VerificationLayer};
use aula_core::text;
use aula_core::traits::IEmbeddingProvider;
use aula_embeddings::math;

use crate::claims::Claim;

/// Result of the embedding layer.
#[derive(Debug, Clone)]
pub struct EmbeddingOutcome {
    pub check: CheckResult,
    /// Best similarity per claim, in claim order. Empty when embedding failed.
    pub similarities: Vec<f64>,
    pub degradation: Option<DegradationEvent>,
}

/// Evidence chunks split into sentences.
pub fn evidence_sentences(evidence: &FusedEvidence) -> Vec<String> {
    evidence
        .iter()
        .flat_map(|item| text::split_sentences(&item.chunk.text))
        .collect()
}

/// Best cosine similarity of each claim against any evidence sentence.
pub async fn claim_similarities(
    embedder: &dyn IEmbeddingProvider,
    claims: &[Claim],
    sentences: &[String],
) -> AulaResult<Vec<f64>> {
    // One batch, so claims and sentences share a provider and a vector space.
    let texts: Vec<String> = claims
        .iter()
        .map(|c| c.text.clone())
        .chain(sentences.iter().cloned())
        .collect();
    let mut vectors = embedder.embed_batch(&texts).await?;
    if vectors.len() != texts.len() {
        return Err(VerificationError::EmbeddingCountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        }
        .into());
    }
    let sentence_vectors = vectors.split_off(claims.len());
    let claim_vectors = vectors;

    Ok(claim_vectors
        .iter()
        .map(|c| {
            sentence_vectors
                .iter()
                .map(|s| math::cosine(c, s))
                .fold(0.0, f64::max)
        })
        .collect())
}

/// The weakest claim's best similarity must exceed `threshold`.
pub async fn check(
    embedder: &dyn IEmbeddingProvider,
    claims: &[Claim],
    evidence: &FusedEvidence,
    threshold: f64,
) -> EmbeddingOutcome {
    let layer = VerificationLayer::EmbeddingFaithfulness;
    if claims.is_empty() {
        return EmbeddingOutcome {
            check: CheckResult::new(layer, false, 0.0, VerificationError::NoClaims.to_string()),
            similarities: Vec::new(),
            degradation: None,
        };
    }
    let sentences = evidence_sentences(evidence);
    if sentences.is_empty() {
        return EmbeddingOutcome {
            check: CheckResult::new(layer, false, 0.0, "no evidence sentences"),
            similarities: vec![0.0; claims.len()],
            degradation: None,
        };
    }

    match claim_similarities(embedder, claims, &sentences).await {
        Ok(similarities) => {
            let weakest = similarities.iter().copied().fold(f64::INFINITY, f64::min);
            let passed = weakest > threshold;
            let detail =
                format!("weakest claim similarity {weakest:.3} (threshold {threshold:.2})");
            EmbeddingOutcome {
                check: CheckResult::new(layer, passed, weakest, detail),
                similarities,
                degradation: None,
            }
        }
        Err(e) => EmbeddingOutcome {
            check: CheckResult::new(layer, false, 0.0, format!("embedding failed: {e}")),
            similarities: Vec::new(),
            degradation: Some(DegradationEvent::new(
                "embedding_faithfulness",
                e.to_string(),
                "fail_closed",
            )),
        },
    }
}
