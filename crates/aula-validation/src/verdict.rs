//! Verdict assembly. A builder is `Pending`; `approve` and `abstain` consume
//! it, so a finished verdict cannot change status.

use chrono::Utc;
use uuid::Uuid;

use aula_core::models::{
    AbstentionReason, CheckResult, Citation, ClaimScore, Conflict, DegradationEvent,
    VerdictStatus, VerificationLayer, VerificationVerdict,
};

#[derive(Debug, Clone, Default)]
pub struct VerdictBuilder {
    checks: Vec<CheckResult>,
    claim_scores: Vec<ClaimScore>,
    conflicts: Vec<Conflict>,
    confidence: f64,
    contacts: Vec<String>,
    citations: Vec<Citation>,
    diagnostics: Vec<DegradationEvent>,
}

impl VerdictBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> VerdictStatus {
        VerdictStatus::Pending
    }

    /// Record a layer result. A second result for the same layer replaces the first.
    pub fn record(&mut self, check: CheckResult) -> &mut Self {
        match self.checks.iter_mut().find(|c| c.layer == check.layer) {
            Some(existing) => *existing = check,
            None => self.checks.push(check),
        }
        self
    }

    pub fn claim_scores(&mut self, scores: Vec<ClaimScore>) -> &mut Self {
        self.claim_scores = scores;
        self
    }

    pub fn conflicts(&mut self, conflicts: Vec<Conflict>) -> &mut Self {
        self.conflicts = conflicts;
        self
    }

    pub fn confidence(&mut self, confidence: f64) -> &mut Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn contacts(&mut self, contacts: Vec<String>) -> &mut Self {
        self.contacts = contacts;
        self
    }

    pub fn citations(&mut self, citations: Vec<Citation>) -> &mut Self {
        self.citations = citations;
        self
    }

    pub fn diagnostic(&mut self, event: DegradationEvent) -> &mut Self {
        self.diagnostics.push(event);
        self
    }

    /// First layer, in evaluation order, that failed and maps to a reason.
    pub fn first_failure(&self) -> Option<AbstentionReason> {
        VerificationLayer::ORDER.iter().find_map(|layer| {
            self.checks
                .iter()
                .find(|c| c.layer == *layer && !c.passed)
                .and_then(|c| c.layer.failure_reason())
        })
    }

    fn finish(
        mut self,
        status: VerdictStatus,
        reason: Option<AbstentionReason>,
    ) -> VerificationVerdict {
        self.checks
            .sort_by_key(|c| VerificationLayer::ORDER.iter().position(|l| *l == c.layer));
        VerificationVerdict {
            id: Uuid::new_v4(),
            status,
            approved: status == VerdictStatus::Approved,
            claim_scores: self.claim_scores,
            conflict_count: self.conflicts.len(),
            conflicts: self.conflicts,
            confidence: self.confidence,
            reason,
            checks: self.checks,
            contacts: self.contacts,
            citations: self.citations,
            diagnostics: self.diagnostics,
            created_at: Utc::now(),
        }
    }

    /// Approved verdicts carry no contacts.
    pub fn approve(mut self) -> VerificationVerdict {
        self.contacts.clear();
        self.finish(VerdictStatus::Approved, None)
    }

    /// Abstained verdicts carry no citations.
    pub fn abstain(mut self, reason: AbstentionReason) -> VerificationVerdict {
        self.citations.clear();
        self.finish(VerdictStatus::Abstained, Some(reason))
    }
}
