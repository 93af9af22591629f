//! Confidence gate: weighted aggregate of the scoring layers.

use aula_core::config::ConfidenceWeights;
use aula_core::models::{CheckResult, VerificationLayer};

/// Per-layer signals in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Signals {
    pub embedding: f64,
    pub entailment: f64,
    pub heuristic: f64,
    pub cross_reference: f64,
    /// Best vector similarity of the evidence.
    pub retrieval: f64,
}

/// Weighted mean of `signals`, clamped to [0, 1].
pub fn aggregate(signals: &Signals, weights: &ConfidenceWeights) -> f64 {
    let total = weights.total();
    if total <= f64::EPSILON {
        return 0.0;
    }
    let sum = weights.embedding * signals.embedding
        + weights.entailment * signals.entailment
        + weights.heuristic * signals.heuristic
        + weights.cross_reference * signals.cross_reference
        + weights.retrieval * signals.retrieval;
    (sum / total).clamp(0.0, 1.0)
}

pub fn check(signals: &Signals, weights: &ConfidenceWeights, threshold: f64) -> CheckResult {
    let confidence = aggregate(signals, weights);
    CheckResult::new(
        VerificationLayer::ConfidenceGate,
        confidence >= threshold,
        confidence,
        format!("confidence {confidence:.3} (threshold {threshold:.2})"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_signals_give_full_confidence() {
        let s = Signals {
            embedding: 1.0,
            entailment: 1.0,
            heuristic: 1.0,
            cross_reference: 1.0,
            retrieval: 1.0,
        };
        assert!((aggregate(&s, &ConfidenceWeights::default()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn gate_compares_against_threshold() {
        let s = Signals {
            embedding: 0.8,
            entailment: 0.8,
            heuristic: 1.0,
            cross_reference: 0.5,
            retrieval: 0.5,
        };
        // 0.24 + 0.20 + 0.15 + 0.075 + 0.075 = 0.74
        let check = check(&s, &ConfidenceWeights::default(), 0.65);
        assert!(check.passed);
        assert!((check.signal - 0.74).abs() < 1e-9);
        assert!(!super::check(&Signals::default(), &ConfidenceWeights::default(), 0.65).passed);
    }
}
