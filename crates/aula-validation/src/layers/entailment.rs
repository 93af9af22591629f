//! Entailment faithfulness: average best NLI support per claim.
//!
//! Fail-closed: any scorer error fails the layer.

use aula_core::errors::VerificationError;
use aula_core::models::{CheckResult, DegradationEvent, FusedEvidence, VerificationLayer};
use aula_core::traits::INliScorer;
use futures::future::join_all;

use crate::claims::Claim;

#[derive(Debug, Clone)]
pub struct EntailmentOutcome {
    pub check: CheckResult,
    /// Best entailment per claim; `None` when the scorer failed.
    pub scores: Vec<Option<f64>>,
    pub degradation: Option<DegradationEvent>,
}

pub async fn check(
    nli: &dyn INliScorer,
    claims: &[Claim],
    evidence: &FusedEvidence,
    threshold: f64,
) -> EntailmentOutcome {
    let layer = VerificationLayer::EntailmentFaithfulness;
    if claims.is_empty() || evidence.is_empty() {
        let detail = if claims.is_empty() {
            VerificationError::NoClaims.to_string()
        } else {
            "no evidence to entail from".to_string()
        };
        return EntailmentOutcome {
            check: CheckResult::new(layer, false, 0.0, detail),
            scores: vec![Some(0.0); claims.len()],
            degradation: None,
        };
    }

    let per_claim = join_all(claims.iter().map(|claim| async move {
        let scores = join_all(
            evidence
                .iter()
                .map(|item| nli.entails(&item.chunk.text, &claim.text)),
        )
        .await;
        scores
            .into_iter()
            .try_fold(0.0f64, |best, s| s.map(|s| best.max(s.clamp(0.0, 1.0))))
    }))
    .await;

    let mut scores = Vec::with_capacity(claims.len());
    for result in per_claim {
        match result {
            Ok(s) => scores.push(s),
            Err(e) => {
                let error = VerificationError::EntailmentFailed {
                    reason: e.to_string(),
                };
                return EntailmentOutcome {
                    check: CheckResult::new(layer, false, 0.0, error.to_string()),
                    scores: vec![None; claims.len()],
                    degradation: Some(DegradationEvent::new(
                        "entailment",
                        error.to_string(),
                        "fail_closed",
                    )),
                };
            }
        }
    }

    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    let passed = average >= threshold;
    EntailmentOutcome {
        check: CheckResult::new(
            layer,
            passed,
            average,
            format!("average entailment {average:.3} (threshold {threshold:.2})"),
        ),
        scores: scores.into_iter().map(Some).collect(),
        degradation: None,
    }
}
